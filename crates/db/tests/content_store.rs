//! Integration tests for `PgContentStore` against a real database.
//!
//! Each test gets a fresh database from `#[sqlx::test]` with the crate's
//! migrations applied, so the stored-row mapping, filtered listing SQL,
//! conditional update and trash purge all run against Postgres.

use chrono::Utc;
use pressroom_core::content::{Author, ContentRecord, NewContent};
use pressroom_core::query::{ContentFilter, ContentQuery, PageWindow};
use pressroom_core::store::ContentStore;
use pressroom_core::types::ContentId;
use pressroom_db::PgContentStore;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn record(value: serde_json::Value) -> ContentRecord {
    let input: NewContent = serde_json::from_value(value).unwrap();
    let author = Author {
        id: "user-1".into(),
        name: "Editor".into(),
        email: None,
    };
    ContentRecord::new(ContentId::now_v7(), input, author, Utc::now()).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn insert_and_find_round_trip(pool: PgPool) {
    let store = PgContentStore::new(pool);
    let item = record(json!({
        "title": "Hello World",
        "content_type": "post",
        "metadata": {"seo": {"metaTitle": "Hello"}, "custom": 1}
    }));
    store.insert(&item).await.unwrap();

    let found = store.find(item.id).await.unwrap().unwrap();
    assert_eq!(found.slug, "hello-world");
    assert_eq!(found.metadata.extra["custom"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_bumps_revision_and_keeps_views(pool: PgPool) {
    let store = PgContentStore::new(pool);
    let mut item = record(json!({"title": "Counted", "content_type": "post"}));
    store.insert(&item).await.unwrap();
    assert!(store.increment_views(item.id).await.unwrap());

    item.title = "Renamed".into();
    let stored = store.update(&item, Some(1)).await.unwrap().unwrap();
    assert_eq!(stored.revision, 2);
    assert_eq!(stored.metadata.views, 1);

    assert!(store.update(&item, Some(1)).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn trash_hides_from_listing_and_purges(pool: PgPool) {
    let store = PgContentStore::new(pool);
    let item = record(json!({"title": "Short lived", "content_type": "press"}));
    store.insert(&item).await.unwrap();

    assert!(store.mark_trashed(item.id, Utc::now()).await.unwrap());
    assert!(!store.mark_trashed(item.id, Utc::now()).await.unwrap());

    let plan = ContentQuery::default().plan();
    let active = store.query(&plan.filter, Some(plan.window)).await.unwrap();
    assert_eq!(active.total, 0);

    let trashed = store.query(&ContentFilter::trashed(None), None).await.unwrap();
    assert_eq!(trashed.total, 1);

    assert_eq!(store.purge_trashed().await.unwrap(), 1);
    assert!(store.find(item.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn pagination_windows_results(pool: PgPool) {
    let store = PgContentStore::new(pool);
    for i in 0..25 {
        store
            .insert(&record(json!({"title": format!("Item {i}"), "content_type": "post"})))
            .await
            .unwrap();
    }
    let page = store
        .query(&ContentFilter::active(), Some(PageWindow { page: 3, limit: 10 }))
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.records.len(), 5);
}
