//! Repository for trash operations on the `content` table.
//!
//! Soft delete and restore flip `deleted_at`; purge is a hard delete that
//! only ever touches rows already in the trash.

use pressroom_core::types::{ContentId, Timestamp};
use sqlx::PgPool;

/// Removes every trashed row that is not an ancestor of an active row.
///
/// `kept` walks upward from each active row through `parent_id`, so a
/// trashed parent survives while any descendant is still active.
const PURGE_ALL_SQL: &str = "\
    WITH RECURSIVE kept AS (
        SELECT id, parent_id FROM content WHERE deleted_at IS NULL
        UNION
        SELECT p.id, p.parent_id FROM content p JOIN kept k ON p.id = k.parent_id
    )
    DELETE FROM content
    WHERE deleted_at IS NOT NULL
      AND id NOT IN (SELECT id FROM kept)";

/// Provides soft-delete, restore and purge operations.
pub struct TrashRepo;

impl TrashRepo {
    /// Mark an active row as trashed. Returns `false` if it was not active.
    pub async fn soft_delete(
        pool: &PgPool,
        id: ContentId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE content SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .bind(at)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear `deleted_at` on a trashed row. Returns `false` if it was not trashed.
    pub async fn restore(pool: &PgPool, id: ContentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete one trashed row. Returns `false` if it was absent or active.
    pub async fn purge_one(pool: &PgPool, id: ContentId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM content WHERE id = $1 AND deleted_at IS NOT NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete every purgeable trashed row. Returns the count removed.
    pub async fn purge_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(PURGE_ALL_SQL).execute(pool).await?;
        Ok(result.rows_affected())
    }
}
