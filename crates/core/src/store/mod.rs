//! Storage abstraction for content records.
//!
//! The service only talks to a [`ContentStore`]. Production runs on the
//! Postgres implementation in `pressroom_db`; tests and local development can
//! use [`MemoryContentStore`].

mod memory;

pub use memory::MemoryContentStore;

use async_trait::async_trait;

use crate::content::ContentRecord;
use crate::error::CoreError;
use crate::query::{ContentFilter, PageWindow};
use crate::types::{ContentId, Timestamp};

/// Records matching a filter plus the total match count.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub records: Vec<ContentRecord>,
    pub total: i64,
}

/// Persistent collection of content records.
///
/// Implementations must be safe to share between request tasks. Every method
/// is a single atomic step against the backing storage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a freshly constructed record.
    async fn insert(&self, record: &ContentRecord) -> Result<(), CoreError>;

    /// Fetch a record by id, trashed or not.
    async fn find(&self, id: ContentId) -> Result<Option<ContentRecord>, CoreError>;

    /// Overwrite the mutable fields of an active record and bump its revision.
    ///
    /// With `expected_revision` the write only happens if the stored revision
    /// still matches. Returns the stored record, or `None` when nothing was
    /// written (missing, trashed, or stale revision).
    async fn update(
        &self,
        record: &ContentRecord,
        expected_revision: Option<i64>,
    ) -> Result<Option<ContentRecord>, CoreError>;

    /// Records matching `filter` in the filter's order, windowed when asked.
    async fn query(
        &self,
        filter: &ContentFilter,
        window: Option<PageWindow>,
    ) -> Result<QueryResult, CoreError>;

    /// Set `deleted_at` on an active record. `false` if it was not active.
    async fn mark_trashed(&self, id: ContentId, at: Timestamp) -> Result<bool, CoreError>;

    /// Clear `deleted_at` on a trashed record. `false` if it was not trashed.
    async fn mark_restored(&self, id: ContentId) -> Result<bool, CoreError>;

    /// Remove a trashed record. `false` if it was absent or active.
    async fn purge(&self, id: ContentId) -> Result<bool, CoreError>;

    /// Remove every trashed record that no remaining record points at as its
    /// parent. Returns how many were removed.
    async fn purge_trashed(&self) -> Result<u64, CoreError>;

    /// Number of records (active or trashed) whose parent is `id`.
    async fn count_children(&self, id: ContentId) -> Result<i64, CoreError>;

    /// Add one to `metadata.views` of an active record.
    async fn increment_views(&self, id: ContentId) -> Result<bool, CoreError>;
}
