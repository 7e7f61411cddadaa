//! HTTP-level integration tests for the beat catalog: public reads, search,
//! and administrator-only mutations.

mod common;

use axum::http::StatusCode;
use beatstore_cloud::media::MediaKind;
use beatstore_db::store::Store;
use common::{
    admin_token, beat_body, body_json, build_test_app, delete_auth, get, get_auth,
    post_json, post_json_auth, put_json_auth, upload_beat, user_token, TestApp,
};
use serde_json::json;

async fn beat_count(test: &TestApp) -> i64 {
    test.store.stats().await.unwrap().beat_count
}

fn titles(json: &serde_json::Value) -> Vec<&str> {
    json.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect()
}

/// Upload three listings and return an admin token.
async fn seeded() -> (TestApp, String) {
    let test = build_test_app();
    let token = admin_token(&test).await;
    upload_beat(test.app(), &token, beat_body("Night Drive", "Trap", 29.99)).await;
    upload_beat(test.app(), &token, beat_body("Trapdoor", "Drill", 19.99)).await;
    upload_beat(test.app(), &token, beat_body("Sunday", "Trap Soul", 24.0)).await;
    (test, token)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_empty_initially() {
    let test = build_test_app();
    let response = get(test.app(), "/api/beats").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn list_returns_beats_in_upload_order() {
    let (test, _) = seeded().await;

    let json = body_json(get(test.app(), "/api/beats").await).await;

    assert_eq!(titles(&json), vec!["Night Drive", "Trapdoor", "Sunday"]);
    assert_eq!(json[0]["bpm"], 140);
    assert_eq!(json[0]["price"], 29.99);
    assert!(json[0]["createdAt"].is_string());
}

#[tokio::test]
async fn get_by_id_and_unknown_id() {
    let (test, _) = seeded().await;
    let first = body_json(get(test.app(), "/api/beats").await).await[0]["id"]
        .as_i64()
        .unwrap();

    let found = get(test.app(), &format!("/api/beats/{first}")).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(body_json(found).await["title"], "Night Drive");

    let missing = get(test.app(), "/api/beats/9999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let json = body_json(missing).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Beat with id 9999 not found");
}

#[tokio::test]
async fn search_matches_title_or_genre_ignoring_case() {
    let (test, _) = seeded().await;

    let json = body_json(get(test.app(), "/api/beats/search?q=TRAP").await).await;

    assert_eq!(titles(&json), vec!["Night Drive", "Trapdoor", "Sunday"]);

    let json = body_json(get(test.app(), "/api/beats/search?q=drill").await).await;
    assert_eq!(titles(&json), vec!["Trapdoor"]);

    let json = body_json(get(test.app(), "/api/beats/search?q=polka").await).await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn blank_or_missing_query_matches_everything() {
    let (test, _) = seeded().await;

    let blank = body_json(get(test.app(), "/api/beats/search?q=%20%20").await).await;
    let missing = body_json(get(test.app(), "/api/beats/search").await).await;

    assert_eq!(titles(&blank).len(), 3);
    assert_eq!(blank, missing);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let (test, _) = seeded().await;

    let json = body_json(get(test.app(), "/api/beats/search?q=%25").await).await;

    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn genre_listing_is_an_exact_case_insensitive_match() {
    let (test, _) = seeded().await;

    let json = body_json(get(test.app(), "/api/beats/genre/trap").await).await;
    assert_eq!(titles(&json), vec!["Night Drive"]);

    let json = body_json(get(test.app(), "/api/beats/genre/Trap%20Soul").await).await;
    assert_eq!(titles(&json), vec!["Sunday"]);
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_returns_the_created_listing() {
    let test = build_test_app();
    let token = admin_token(&test).await;

    let response =
        post_json_auth(test.app(), "/api/upload-beat", beat_body("Night Drive", "Trap", 29.99), &token)
            .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_i64());
    assert_eq!(json["title"], "Night Drive");
    assert_eq!(json["genre"], "Trap");
    assert_eq!(json["price"], 29.99);
}

#[tokio::test]
async fn upload_alias_path_works() {
    let test = build_test_app();
    let token = admin_token(&test).await;

    let response =
        post_json_auth(test.app(), "/api/beats/upload", beat_body("Alias", "Boom Bap", 10.0), &token)
            .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(beat_count(&test).await, 1);
}

#[tokio::test]
async fn upload_accepts_form_style_numeric_strings() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let mut body = beat_body("Strings", "Lo-Fi", 0.0);
    body["bpm"] = json!("85");
    body["price"] = json!("14.99");

    let response = post_json_auth(test.app(), "/api/upload-beat", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["bpm"], 85);
    assert_eq!(json["price"], 14.99);
}

#[tokio::test]
async fn upload_with_missing_fields_is_rejected_and_stores_nothing() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let body = json!({
        "picture": "https://cdn.test/cover.jpg",
        "audio": "https://cdn.test/track.mp3",
    });

    let response = post_json_auth(test.app(), "/api/upload-beat", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Missing or invalid fields: bpm, genre, price, title");
    assert_eq!(beat_count(&test).await, 0);
}

#[tokio::test]
async fn upload_rejects_non_positive_numbers_and_bad_urls() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let mut body = beat_body("Broken", "Trap", -5.0);
    body["bpm"] = json!(0);
    body["audio"] = json!("track.mp3");

    let response = post_json_auth(test.app(), "/api/upload-beat", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Missing or invalid fields: audio, bpm, price"
    );
    assert_eq!(beat_count(&test).await, 0);
}

#[tokio::test]
async fn upload_requires_a_token() {
    let test = build_test_app();

    let response = post_json(test.app(), "/api/upload-beat", beat_body("Anon", "Trap", 9.99)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(beat_count(&test).await, 0);
}

#[tokio::test]
async fn upload_requires_an_administrator() {
    let test = build_test_app();
    let token = user_token(&test).await;

    let response =
        post_json_auth(test.app(), "/api/upload-beat", beat_body("Fan", "Trap", 9.99), &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    assert_eq!(beat_count(&test).await, 0);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_replaces_only_supplied_fields() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let id = upload_beat(test.app(), &token, beat_body("Night Drive", "Trap", 29.99)).await;

    let response = put_json_auth(
        test.app(),
        &format!("/api/beats/{id}"),
        json!({ "price": 39.99, "genre": "Drill" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["price"], 39.99);
    assert_eq!(json["genre"], "Drill");
    assert_eq!(json["title"], "Night Drive");
    assert_eq!(json["bpm"], 140);
}

#[tokio::test]
async fn update_validates_supplied_fields() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let id = upload_beat(test.app(), &token, beat_body("Night Drive", "Trap", 29.99)).await;

    let response = put_json_auth(
        test.app(),
        &format!("/api/beats/{id}"),
        json!({ "bpm": -1 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let unchanged = body_json(get(test.app(), &format!("/api/beats/{id}")).await).await;
    assert_eq!(unchanged["bpm"], 140);
}

#[tokio::test]
async fn update_unknown_beat_is_not_found() {
    let test = build_test_app();
    let token = admin_token(&test).await;

    let response =
        put_json_auth(test.app(), "/api/beats/404", json!({ "title": "Ghost" }), &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_requires_an_administrator() {
    let test = build_test_app();
    let admin = admin_token(&test).await;
    let id = upload_beat(test.app(), &admin, beat_body("Night Drive", "Trap", 29.99)).await;
    let user = user_token(&test).await;

    let response = put_json_auth(
        test.app(),
        &format!("/api/beats/{id}"),
        json!({ "price": 1.0 }),
        &user,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_listing_and_media() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let id = upload_beat(test.app(), &token, beat_body("Night Drive", "Trap", 29.99)).await;

    let response = delete_auth(test.app(), &format!("/api/beats/{id}"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Beat deleted successfully");
    assert_eq!(
        get(test.app(), &format!("/api/beats/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );

    let deleted = test.media.deleted.lock().unwrap().clone();
    assert_eq!(deleted.len(), 2);
    assert!(deleted[0].0.ends_with("Night Drive.jpg"));
    assert_eq!(deleted[0].1, MediaKind::Image);
    assert_eq!(deleted[1].1, MediaKind::Audio);
}

#[tokio::test]
async fn delete_unknown_beat_is_not_found_and_changes_nothing() {
    let (test, token) = seeded().await;

    let response = delete_auth(test.app(), "/api/beats/9999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(beat_count(&test).await, 3);
    assert!(test.media.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_succeeds_when_media_cleanup_fails() {
    let test = build_test_app();
    let token = admin_token(&test).await;
    let mut body = beat_body("Fragile", "Trap", 9.99);
    body["picture"] = json!("https://cdn.test/fail/cover.jpg");
    let id = upload_beat(test.app(), &token, body).await;

    let response = delete_auth(test.app(), &format!("/api/beats/{id}"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(beat_count(&test).await, 0);
    // The audio asset is still attempted after the cover fails.
    assert_eq!(test.media.deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_requires_an_administrator() {
    let test = build_test_app();
    let admin = admin_token(&test).await;
    let id = upload_beat(test.app(), &admin, beat_body("Night Drive", "Trap", 29.99)).await;
    let user = user_token(&test).await;

    let response = delete_auth(test.app(), &format!("/api/beats/{id}"), &user).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(beat_count(&test).await, 1);

    let response = get_auth(test.app(), "/api/admin/dashboard", &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
