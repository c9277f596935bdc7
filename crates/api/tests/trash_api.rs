//! HTTP-level integration tests for the `/content/trash` endpoints.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{body_json, build_test_app, create_content, delete, get, put_json, send};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn trashed(app: &Router, body: Value) -> String {
    let content = create_content(app, body).await;
    let id = content["id"].as_str().unwrap().to_string();
    let response = delete(app, &format!("/api/v1/content/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_trash_empty() {
    let app = build_test_app();
    let response = get(&app, "/api/v1/content/trash").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["content"].as_array().unwrap().is_empty());
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn list_trash_shows_soft_deleted_records() {
    let app = build_test_app();
    let id = trashed(&app, json!({"title": "Gone", "contentType": "post"})).await;
    create_content(&app, json!({"title": "Still here", "contentType": "post"})).await;

    let json = body_json(get(&app, "/api/v1/content/trash").await).await;
    let items = json["content"].as_array().unwrap();
    assert_eq!(json["total"], 1);
    assert_eq!(items[0]["id"], id.as_str());
    assert!(items[0]["deleted_at"].is_string());
}

#[tokio::test]
async fn list_trash_filters_by_type() {
    let app = build_test_app();
    trashed(&app, json!({"title": "Old post", "contentType": "post"})).await;
    trashed(&app, json!({"title": "Old clip", "contentType": "feed", "platform": "youtube"})).await;

    let json = body_json(get(&app, "/api/v1/content/trash?contentType=feed").await).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["content"][0]["title"], "Old clip");

    let json = body_json(get(&app, "/api/v1/content/trash?contentType=all").await).await;
    assert_eq!(json["total"], 2);
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restore_brings_record_back() {
    let app = build_test_app();
    let id = trashed(&app, json!({"title": "Second chance", "contentType": "post"})).await;

    let response = put_json(
        &app,
        &format!("/api/v1/content/trash/{id}"),
        json!({"action": "restore"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id.as_str());
    assert!(json["deleted_at"].is_null());

    let response = get(&app, &format!("/api/v1/content/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_action_returns_400() {
    let app = build_test_app();
    let id = trashed(&app, json!({"title": "Stuck", "contentType": "post"})).await;

    let response = put_json(
        &app,
        &format!("/api/v1/content/trash/{id}"),
        json!({"action": "archive"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_action_returns_400_json() {
    let app = build_test_app();
    let id = trashed(&app, json!({"title": "Actionless", "contentType": "post"})).await;
    let uri = format!("/api/v1/content/trash/{id}");

    for body in [json!({}), json!({"action": ""}), json!({"action": null})] {
        let response = put_json(&app, &uri, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["error"].is_string());
    }

    // Still trashed.
    let json = body_json(get(&app, "/api/v1/content/trash").await).await;
    assert_eq!(json["total"], 1);
}

#[tokio::test]
async fn restore_active_record_returns_404() {
    let app = build_test_app();
    let content = create_content(&app, json!({"title": "Alive", "contentType": "post"})).await;
    let id = content["id"].as_str().unwrap();

    let response = put_json(
        &app,
        &format!("/api/v1/content/trash/{id}"),
        json!({"action": "restore"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Purge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn purge_one_removes_record_permanently() {
    let app = build_test_app();
    let id = trashed(&app, json!({"title": "Shredded", "contentType": "press"})).await;

    let response = delete(&app, &format!("/api/v1/content/trash/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Content permanently deleted");

    let json = body_json(get(&app, "/api/v1/content/trash").await).await;
    assert_eq!(json["total"], 0);

    let response = put_json(
        &app,
        &format!("/api/v1/content/trash/{id}"),
        json!({"action": "restore"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purge_parent_with_children_returns_409() {
    let app = build_test_app();
    let guide = create_content(&app, json!({"title": "Guide", "contentType": "resource"})).await;
    let guide_id = guide["id"].as_str().unwrap().to_string();
    trashed(
        &app,
        json!({"title": "Chapter", "contentType": "resource", "parentId": guide_id}),
    )
    .await;
    delete(&app, &format!("/api/v1/content/{guide_id}")).await;

    let response = delete(&app, &format!("/api/v1/content/trash/{guide_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn empty_trash_purges_everything_trashed() {
    let app = build_test_app();
    trashed(&app, json!({"title": "One", "contentType": "post"})).await;
    trashed(&app, json!({"title": "Two", "contentType": "update"})).await;
    create_content(&app, json!({"title": "Keeper", "contentType": "post"})).await;

    let response = delete(&app, "/api/v1/content/trash").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["purged"], 2);

    let json = body_json(get(&app, "/api/v1/content/trash").await).await;
    assert_eq!(json["total"], 0);
    let json = body_json(get(&app, "/api/v1/content").await).await;
    assert_eq!(json["pagination"]["total"], 1);
}

#[tokio::test]
async fn empty_trash_keeps_parents_of_active_children() {
    let app = build_test_app();
    let guide = create_content(&app, json!({"title": "Guide", "contentType": "resource"})).await;
    let guide_id = guide["id"].as_str().unwrap().to_string();
    create_content(
        &app,
        json!({"title": "Chapter", "contentType": "resource", "parentId": guide_id}),
    )
    .await;
    delete(&app, &format!("/api/v1/content/{guide_id}")).await;

    let json = body_json(delete(&app, "/api/v1/content/trash").await).await;
    assert_eq!(json["purged"], 0);

    let json = body_json(get(&app, "/api/v1/content/trash").await).await;
    assert_eq!(json["total"], 1);
}

#[tokio::test]
async fn empty_trash_requires_auth() {
    let app = build_test_app();
    let response = send(&app, Method::DELETE, "/api/v1/content/trash", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
