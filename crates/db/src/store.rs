//! [`ContentStore`] backed by PostgreSQL.

use async_trait::async_trait;
use pressroom_core::content::ContentRecord;
use pressroom_core::error::CoreError;
use pressroom_core::query::{ContentFilter, PageWindow};
use pressroom_core::store::{ContentStore, QueryResult};
use pressroom_core::types::{ContentId, Timestamp};

use crate::models::content::ContentRow;
use crate::repositories::{ContentRepo, TrashRepo};
use crate::DbPool;

/// PostgreSQL unique-violation error code.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL foreign-key-violation error code.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Translate a driver error into a domain error, logging the detail.
fn map_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return CoreError::Conflict("Content already exists".into());
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return CoreError::Conflict(
                        "Content is still referenced by another record".into(),
                    );
                }
                _ => {}
            }
        }
        tracing::error!(operation, error = %err, "Content store query failed");
        CoreError::Storage(format!("{operation}: {err}"))
    }
}

fn to_records(rows: Vec<ContentRow>) -> Result<Vec<ContentRecord>, CoreError> {
    rows.into_iter().map(ContentRecord::try_from).collect()
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn insert(&self, record: &ContentRecord) -> Result<(), CoreError> {
        let row = ContentRow::from_record(record);
        ContentRepo::insert(&self.pool, &row)
            .await
            .map_err(map_err("insert"))
    }

    async fn find(&self, id: ContentId) -> Result<Option<ContentRecord>, CoreError> {
        ContentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_err("find"))?
            .map(ContentRecord::try_from)
            .transpose()
    }

    async fn update(
        &self,
        record: &ContentRecord,
        expected_revision: Option<i64>,
    ) -> Result<Option<ContentRecord>, CoreError> {
        let row = ContentRow::from_record(record);
        ContentRepo::update(&self.pool, &row, expected_revision)
            .await
            .map_err(map_err("update"))?
            .map(ContentRecord::try_from)
            .transpose()
    }

    async fn query(
        &self,
        filter: &ContentFilter,
        window: Option<PageWindow>,
    ) -> Result<QueryResult, CoreError> {
        let (rows, total) = ContentRepo::list(&self.pool, filter, window)
            .await
            .map_err(map_err("query"))?;
        Ok(QueryResult {
            records: to_records(rows)?,
            total,
        })
    }

    async fn mark_trashed(&self, id: ContentId, at: Timestamp) -> Result<bool, CoreError> {
        TrashRepo::soft_delete(&self.pool, id, at)
            .await
            .map_err(map_err("mark_trashed"))
    }

    async fn mark_restored(&self, id: ContentId) -> Result<bool, CoreError> {
        TrashRepo::restore(&self.pool, id)
            .await
            .map_err(map_err("mark_restored"))
    }

    async fn purge(&self, id: ContentId) -> Result<bool, CoreError> {
        TrashRepo::purge_one(&self.pool, id)
            .await
            .map_err(map_err("purge"))
    }

    async fn purge_trashed(&self) -> Result<u64, CoreError> {
        TrashRepo::purge_all(&self.pool)
            .await
            .map_err(map_err("purge_trashed"))
    }

    async fn count_children(&self, id: ContentId) -> Result<i64, CoreError> {
        ContentRepo::count_children(&self.pool, id)
            .await
            .map_err(map_err("count_children"))
    }

    async fn increment_views(&self, id: ContentId) -> Result<bool, CoreError> {
        ContentRepo::increment_views(&self.pool, id)
            .await
            .map_err(map_err("increment_views"))
    }
}
