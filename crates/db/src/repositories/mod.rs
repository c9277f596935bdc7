//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod content_repo;
pub mod trash_repo;

pub use content_repo::ContentRepo;
pub use trash_repo::TrashRepo;
