use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ContentStore, QueryResult};
use crate::content::ContentRecord;
use crate::error::CoreError;
use crate::query::{ContentFilter, PageWindow};
use crate::types::{ContentId, Timestamp};

/// In-process store backed by a `HashMap`.
///
/// Used by tests and by `STORAGE_BACKEND=memory`. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: RwLock<HashMap<ContentId, ContentRecord>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, trashed included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn insert(&self, record: &ContentRecord) -> Result<(), CoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(CoreError::Conflict(format!(
                "Content with id {} already exists",
                record.id
            )));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find(&self, id: ContentId) -> Result<Option<ContentRecord>, CoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(
        &self,
        record: &ContentRecord,
        expected_revision: Option<i64>,
    ) -> Result<Option<ContentRecord>, CoreError> {
        let mut records = self.records.write().await;
        let Some(stored) = records.get_mut(&record.id) else {
            return Ok(None);
        };
        if stored.is_trashed() {
            return Ok(None);
        }
        if expected_revision.is_some_and(|rev| rev != stored.revision) {
            return Ok(None);
        }

        // Counters are owned by the store; keep whatever it has now.
        let (views, likes) = (stored.metadata.views, stored.metadata.likes);
        stored.title = record.title.clone();
        stored.slug = record.slug.clone();
        stored.variant = record.variant.clone();
        stored.status = record.status;
        stored.metadata = record.metadata.clone();
        stored.metadata.views = views;
        stored.metadata.likes = likes;
        stored.updated_at = record.updated_at;
        stored.published_at = record.published_at;
        stored.revision += 1;
        Ok(Some(stored.clone()))
    }

    async fn query(
        &self,
        filter: &ContentFilter,
        window: Option<PageWindow>,
    ) -> Result<QueryResult, CoreError> {
        let records = self.records.read().await;
        let mut matched: Vec<&ContentRecord> =
            records.values().filter(|r| filter.matches(r)).collect();
        matched.sort_by(|a, b| filter.compare(a, b));

        let total = matched.len() as i64;
        let records = match window {
            Some(window) => matched
                .into_iter()
                .skip(window.offset() as usize)
                .take(window.limit as usize)
                .cloned()
                .collect(),
            None => matched.into_iter().cloned().collect(),
        };
        Ok(QueryResult { records, total })
    }

    async fn mark_trashed(&self, id: ContentId, at: Timestamp) -> Result<bool, CoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_trashed() => {
                record.deleted_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_restored(&self, id: ContentId) -> Result<bool, CoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if record.is_trashed() => {
                record.deleted_at = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge(&self, id: ContentId) -> Result<bool, CoreError> {
        let mut records = self.records.write().await;
        if !records.get(&id).is_some_and(ContentRecord::is_trashed) {
            return Ok(false);
        }
        records.remove(&id);
        Ok(true)
    }

    async fn purge_trashed(&self) -> Result<u64, CoreError> {
        let mut records = self.records.write().await;

        // Active records and every ancestor of one must survive.
        let mut kept: HashSet<ContentId> = HashSet::new();
        let mut frontier: Vec<ContentId> = records
            .values()
            .filter(|r| !r.is_trashed())
            .map(|r| r.id)
            .collect();
        while let Some(id) = frontier.pop() {
            if !kept.insert(id) {
                continue;
            }
            if let Some(parent) = records.get(&id).and_then(|r| r.variant.parent_id()) {
                frontier.push(parent);
            }
        }

        let before = records.len();
        records.retain(|id, r| !r.is_trashed() || kept.contains(id));
        Ok((before - records.len()) as u64)
    }

    async fn count_children(&self, id: ContentId) -> Result<i64, CoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.variant.parent_id() == Some(id))
            .count() as i64)
    }

    async fn increment_views(&self, id: ContentId) -> Result<bool, CoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_trashed() => {
                record.metadata.views += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
