//! Repository for the `content` table.
//!
//! Listing SQL is assembled with [`QueryBuilder`] from the same
//! [`ContentFilter`] the in-memory store evaluates in process.

use pressroom_core::query::{like_pattern, ContentFilter, PageWindow, ParentFilter, Scope};
use pressroom_core::types::ContentId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::content::{ContentRow, COLUMNS};

/// Provides CRUD and listing operations for content rows.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert a new row.
    pub async fn insert(pool: &PgPool, row: &ContentRow) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO content
                (id, title, slug, content_type, status, body, excerpt, summary,
                 featured_image, version, update_type, impact_level, parent_id, attachments,
                 external_link, platform, embed_code, post_url, description,
                 author_id, author_name, author_email, metadata, revision,
                 created_at, updated_at, published_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)",
        )
        .bind(row.id)
        .bind(&row.title)
        .bind(&row.slug)
        .bind(&row.content_type)
        .bind(&row.status)
        .bind(&row.body)
        .bind(&row.excerpt)
        .bind(&row.summary)
        .bind(&row.featured_image)
        .bind(&row.version)
        .bind(&row.update_type)
        .bind(&row.impact_level)
        .bind(row.parent_id)
        .bind(&row.attachments)
        .bind(&row.external_link)
        .bind(&row.platform)
        .bind(&row.embed_code)
        .bind(&row.post_url)
        .bind(&row.description)
        .bind(&row.author_id)
        .bind(&row.author_name)
        .bind(&row.author_email)
        .bind(&row.metadata)
        .bind(row.revision)
        .bind(row.created_at)
        .bind(row.updated_at)
        .bind(row.published_at)
        .bind(row.deleted_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a row by id, including trashed rows.
    pub async fn find_by_id(pool: &PgPool, id: ContentId) -> Result<Option<ContentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content WHERE id = $1");
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the editable columns of an active row and bump `revision`.
    ///
    /// The `views` and `likes` counters are taken from the stored row, not
    /// from `row.metadata`. When `expected_revision` is set the update only
    /// applies to that revision. Returns `None` if no row matched.
    pub async fn update(
        pool: &PgPool,
        row: &ContentRow,
        expected_revision: Option<i64>,
    ) -> Result<Option<ContentRow>, sqlx::Error> {
        let query = format!(
            "UPDATE content SET
                title = $2,
                slug = $3,
                status = $4,
                body = $5,
                excerpt = $6,
                summary = $7,
                featured_image = $8,
                version = $9,
                update_type = $10,
                impact_level = $11,
                parent_id = $12,
                attachments = $13,
                external_link = $14,
                platform = $15,
                embed_code = $16,
                post_url = $17,
                description = $18,
                metadata = $19::jsonb || jsonb_build_object(
                    'views', COALESCE(metadata->'views', '0'::jsonb),
                    'likes', COALESCE(metadata->'likes', '0'::jsonb)
                ),
                updated_at = $20,
                published_at = $21,
                revision = revision + 1
             WHERE id = $1
               AND deleted_at IS NULL
               AND ($22::BIGINT IS NULL OR revision = $22)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(row.id)
            .bind(&row.title)
            .bind(&row.slug)
            .bind(&row.status)
            .bind(&row.body)
            .bind(&row.excerpt)
            .bind(&row.summary)
            .bind(&row.featured_image)
            .bind(&row.version)
            .bind(&row.update_type)
            .bind(&row.impact_level)
            .bind(row.parent_id)
            .bind(&row.attachments)
            .bind(&row.external_link)
            .bind(&row.platform)
            .bind(&row.embed_code)
            .bind(&row.post_url)
            .bind(&row.description)
            .bind(&row.metadata)
            .bind(row.updated_at)
            .bind(row.published_at)
            .bind(expected_revision)
            .fetch_optional(pool)
            .await
    }

    /// Rows matching `filter` plus the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &ContentFilter,
        window: Option<PageWindow>,
    ) -> Result<(Vec<ContentRow>, i64), sqlx::Error> {
        let mut count = count_query(filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        let mut select = select_query(filter, window);
        let rows = select.build_query_as::<ContentRow>().fetch_all(pool).await?;
        Ok((rows, total))
    }

    /// Number of rows, trashed or not, whose parent is `id`.
    pub async fn count_children(pool: &PgPool, id: ContentId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM content WHERE parent_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Atomically add one to `metadata.views`. Returns `true` if a row changed.
    pub async fn increment_views(pool: &PgPool, id: ContentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content
             SET metadata = jsonb_set(
                 metadata,
                 '{views}',
                 to_jsonb(COALESCE((metadata->>'views')::BIGINT, 0) + 1)
             )
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Query assembly
// ---------------------------------------------------------------------------

/// `SELECT COUNT(*)` over the rows matching `filter`.
pub fn count_query(filter: &ContentFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM content");
    push_filter(&mut qb, filter);
    qb
}

/// Ordered, optionally windowed `SELECT` over the rows matching `filter`.
pub fn select_query(
    filter: &ContentFilter,
    window: Option<PageWindow>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM content"));
    push_filter(&mut qb, filter);
    qb.push(match filter.scope {
        Scope::Active => " ORDER BY published_at DESC NULLS LAST, created_at DESC, id DESC",
        Scope::Trashed => " ORDER BY deleted_at DESC, id DESC",
    });
    if let Some(window) = window {
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset());
    }
    qb
}

/// Append the `WHERE` clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &ContentFilter) {
    qb.push(match filter.scope {
        Scope::Active => " WHERE deleted_at IS NULL",
        Scope::Trashed => " WHERE deleted_at IS NOT NULL",
    });

    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(content_type) = filter.content_type {
        qb.push(" AND content_type = ").push_bind(content_type.as_str());
    }
    if let Some(platform) = filter.platform {
        qb.push(" AND platform = ").push_bind(platform.as_str());
    }
    if let Some(update_type) = filter.update_type {
        qb.push(" AND update_type = ").push_bind(update_type.as_str());
    }
    match filter.parent {
        Some(ParentFilter::Root) => {
            qb.push(" AND content_type = 'resource' AND parent_id IS NULL");
        }
        Some(ParentFilter::Child(parent_id)) => {
            qb.push(" AND content_type = 'resource' AND parent_id = ")
                .push_bind(parent_id);
        }
        None => {}
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR body ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR summary ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR excerpt ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::query::ContentQuery;
    use serde_json::json;

    fn filter(value: serde_json::Value) -> ContentFilter {
        serde_json::from_value::<ContentQuery>(value)
            .unwrap()
            .plan()
            .filter
    }

    #[test]
    fn active_listing_excludes_trash_and_orders_by_publication() {
        let qb = select_query(&ContentFilter::active(), Some(PageWindow { page: 2, limit: 10 }));
        let sql = qb.sql();
        assert!(sql.contains("WHERE deleted_at IS NULL"));
        assert!(sql.contains("ORDER BY published_at DESC NULLS LAST, created_at DESC, id DESC"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn trash_listing_is_unwindowed_and_newest_first() {
        let qb = select_query(&ContentFilter::trashed(None), None);
        let sql = qb.sql();
        assert!(sql.contains("WHERE deleted_at IS NOT NULL"));
        assert!(sql.ends_with("ORDER BY deleted_at DESC, id DESC"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn filters_bind_in_order() {
        let qb = count_query(&filter(json!({
            "status": "published",
            "contentType": "update",
            "updateType": "fix"
        })));
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM content WHERE deleted_at IS NULL \
             AND status = $1 AND content_type = $2 AND update_type = $3"
        );
    }

    #[test]
    fn root_parent_filter_has_no_binds() {
        let qb = count_query(&filter(json!({"parentId": "root"})));
        assert!(qb
            .sql()
            .ends_with("AND content_type = 'resource' AND parent_id IS NULL"));
    }

    #[test]
    fn child_parent_filter_binds_id() {
        let id = ContentId::now_v7();
        let qb = count_query(&filter(json!({"parentId": id.to_string()})));
        assert!(qb.sql().ends_with("AND parent_id = $1"));
    }

    #[test]
    fn search_spans_four_text_columns() {
        let qb = count_query(&filter(json!({"search": "banjo"})));
        assert!(qb.sql().ends_with(
            "AND (title ILIKE $1 OR body ILIKE $2 OR summary ILIKE $3 OR excerpt ILIKE $4)"
        ));
    }

    #[test]
    fn ignored_options_add_nothing() {
        let qb = count_query(&filter(json!({"status": "all", "platform": "myspace"})));
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM content WHERE deleted_at IS NULL");
    }
}
