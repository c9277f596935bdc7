//! Row structs mapping the `content` table.

pub mod content;
