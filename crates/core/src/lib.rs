//! Pressroom domain crate.
//!
//! Holds the polymorphic content model, metadata merge rules, the
//! status/trash lifecycle, the listing filter plan, the storage trait (with an
//! in-memory implementation) and the [`service::ContentService`] facade that
//! the HTTP layer calls into. Zero internal dependencies.

pub mod content;
pub mod error;
pub mod lifecycle;
pub mod metadata;
pub mod query;
pub mod service;
pub mod slug;
pub mod store;
pub mod types;
