use crate::helpers::{
    authed_json_request, authed_request, expect_status, get_request, json_request,
    moderator_token, read_json, send, spawn_app, spawn_app_with,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

fn review_body(email: &str, content: &str) -> Value {
    json!({
        "product_id": 1,
        "review": content,
        "reviewer": "Alice",
        "reviewer_email": email,
        "rating": 4
    })
}

async fn create_review(app: &crate::helpers::TestApp, body: Value) -> Value {
    let res = send(&app.app, json_request("POST", "/api/v1/reviews", body)).await;
    let res = expect_status(res, StatusCode::CREATED).await;
    read_json(res).await
}

#[tokio::test]
async fn create_returns_201_with_location_and_defaults() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/reviews",
            json!({
                "product_id": 1,
                "review": "Solid kettle, boils fast.",
                "reviewer": "Alice",
                "reviewer_email": "alice@example.com"
            }),
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::CREATED).await;

    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("missing Location header");

    let body: Value = read_json(res).await;
    assert_eq!(location, format!("/api/v1/reviews/{}", body["id"]));
    assert_eq!(body["status"], "approved");
    assert_eq!(body["rating"], 0);
    assert_eq!(body["verified"], false);
    assert_eq!(body["reviewer"], "Alice");
    assert_eq!(body["review"], "Solid kettle, boils fast.");
}

#[tokio::test]
async fn create_rejects_a_client_supplied_id() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    let mut body = review_body("alice@example.com", "Nice.");
    body["id"] = json!(99);
    let res = send(&app.app, json_request("POST", "/api/v1/reviews", body)).await;
    let res = expect_status(res, StatusCode::BAD_REQUEST).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_exists");
}

#[tokio::test]
async fn create_rejects_blank_content() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/reviews",
            review_body("alice@example.com", "   "),
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::BAD_REQUEST).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_content_invalid");
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/reviews",
            json!({
                "product_id": 1,
                "review": "No name or email."
            }),
        ),
    )
    .await;
    expect_status(res, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn create_rejects_non_product_parent() {
    let app = spawn_app();
    app.store.seed_post(7, "page");

    let mut body = review_body("alice@example.com", "Wrong parent.");
    body["product_id"] = json!(7);
    let res = send(&app.app, json_request("POST", "/api/v1/reviews", body)).await;
    let res = expect_status(res, StatusCode::NOT_FOUND).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "product_invalid_id");
}

#[tokio::test]
async fn create_rejects_out_of_range_rating() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    let mut body = review_body("alice@example.com", "Six stars!");
    body["rating"] = json!(6);
    let res = send(&app.app, json_request("POST", "/api/v1/reviews", body)).await;
    expect_status(res, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn duplicate_submission_conflicts() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    create_review(&app, review_body("alice@example.com", "Same words.")).await;

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/reviews",
            review_body("alice@example.com", "Same words."),
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::CONFLICT).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_duplicate");
}

#[tokio::test]
async fn flood_control_rejects_with_400() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    app.store.set_flood_everyone(true);

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/reviews",
            review_body("rapid@example.com", "Too fast."),
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::BAD_REQUEST).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_flood");
}

#[tokio::test]
async fn link_heavy_content_is_held_for_moderation() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    let body = create_review(
        &app,
        review_body(
            "spammy@example.com",
            "Buy at http://a.example and http://b.example",
        ),
    )
    .await;
    assert_eq!(body["status"], "hold");
}

#[tokio::test]
async fn get_unknown_review_is_404() {
    let app = spawn_app();
    let res = send(&app.app, get_request("/api/v1/reviews/12345")).await;
    let res = expect_status(res, StatusCode::NOT_FOUND).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_invalid_id");
}

#[tokio::test]
async fn list_defaults_to_approved_reviews_only() {
    let app = spawn_app();
    app.store.seed_post(1, "product");

    create_review(&app, review_body("a@example.com", "Approved one.")).await;
    // Held by the link threshold.
    create_review(
        &app,
        review_body("b@example.com", "http://x.example http://y.example"),
    )
    .await;

    let res = send(&app.app, get_request("/api/v1/reviews")).await;
    let res = expect_status(res, StatusCode::OK).await;
    let page: Value = read_json(res).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["status"], "approved");
}

#[tokio::test]
async fn listing_held_reviews_requires_moderation_capability() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    create_review(
        &app,
        review_body("b@example.com", "http://x.example http://y.example"),
    )
    .await;

    let res = send(&app.app, get_request("/api/v1/reviews?status=hold")).await;
    expect_status(res, StatusCode::FORBIDDEN).await;

    let token = moderator_token();
    let res = send(
        &app.app,
        authed_request("GET", "/api/v1/reviews?status=hold", &token),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let page: Value = read_json(res).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["status"], "hold");
}

#[tokio::test]
async fn list_rejects_unknown_order_and_status() {
    let app = spawn_app();

    let res = send(&app.app, get_request("/api/v1/reviews?order=sideways")).await;
    expect_status(res, StatusCode::BAD_REQUEST).await;

    let res = send(&app.app, get_request("/api/v1/reviews?status=archived")).await;
    expect_status(res, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn list_paginates_with_envelope_totals() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    for i in 0..3 {
        create_review(
            &app,
            review_body(&format!("r{i}@example.com"), &format!("Review {i}.")),
        )
        .await;
    }

    let res = send(
        &app.app,
        get_request("/api/v1/reviews?per_page=2&page=2&orderby=id&order=asc"),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let page: Value = read_json(res).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["page"], 2);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn update_requires_moderation_capability() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Fine.")).await;

    let res = send(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/v1/reviews/{}", created["id"]),
            json!({ "status": "hold" }),
        ),
    )
    .await;
    expect_status(res, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn update_applies_a_single_status_transition() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Fine.")).await;
    let id = created["id"].as_i64().unwrap();
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_json_request(
            "PUT",
            &format!("/api/v1/reviews/{id}"),
            json!({ "status": "trash" }),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "trash");
    assert_eq!(app.store.approval_of(id).as_deref(), Some("trash"));
}

#[tokio::test]
async fn update_accepts_legacy_status_synonyms() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Fine.")).await;
    let id = created["id"].as_i64().unwrap();
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_json_request(
            "PUT",
            &format!("/api/v1/reviews/{id}"),
            json!({ "status": "0" }),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "hold");

    let res = send(
        &app.app,
        authed_json_request(
            "PUT",
            &format!("/api/v1/reviews/{id}"),
            json!({ "status": "1" }),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn unknown_status_literal_leaves_the_review_untouched() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Fine.")).await;
    let id = created["id"].as_i64().unwrap();
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_json_request(
            "PUT",
            &format!("/api/v1/reviews/{id}"),
            json!({ "status": "archived" }),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn update_changes_fields_and_rating_without_touching_others() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Early impressions.")).await;
    let id = created["id"].as_i64().unwrap();
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_json_request(
            "PUT",
            &format!("/api/v1/reviews/{id}"),
            json!({ "review": "Held up after a month.", "rating": 5 }),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["review"], "Held up after a month.");
    assert_eq!(body["rating"], 5);
    assert_eq!(body["reviewer"], "Alice");
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn delete_without_force_moves_to_trash_then_410() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Trash me.")).await;
    let id = created["id"].as_i64().unwrap();
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_request("DELETE", &format!("/api/v1/reviews/{id}"), &token),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "trash");

    let res = send(
        &app.app,
        authed_request("DELETE", &format!("/api/v1/reviews/{id}"), &token),
    )
    .await;
    let res = expect_status(res, StatusCode::GONE).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_already_trashed");
}

#[tokio::test]
async fn force_delete_returns_a_snapshot_and_removes_the_record() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Gone for good.")).await;
    let id = created["id"].as_i64().unwrap();
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_request("DELETE", &format!("/api/v1/reviews/{id}?force=true"), &token),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["deleted"], true);
    assert_eq!(body["previous"]["id"], id);
    assert_eq!(body["previous"]["review"], "Gone for good.");

    let res = send(&app.app, get_request(&format!("/api/v1/reviews/{id}"))).await;
    expect_status(res, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn delete_requires_moderation_capability() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Protected.")).await;

    let res = send(
        &app.app,
        axum::http::Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/reviews/{}", created["id"]))
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;
    expect_status(res, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn delete_without_trash_support_is_501() {
    let app = spawn_app_with(|config| {
        config.trash_enabled = false;
    });
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "No trash here.")).await;
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_request(
            "DELETE",
            &format!("/api/v1/reviews/{}", created["id"]),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::NOT_IMPLEMENTED).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "trash_not_supported");
}

#[tokio::test]
async fn trash_refused_by_the_store_is_a_delete_failure() {
    let app = spawn_app();
    app.store.seed_post(1, "product");
    let created = create_review(&app, review_body("a@example.com", "Stubborn.")).await;
    app.store.set_refuse_trash(true);
    let token = moderator_token();

    let res = send(
        &app.app,
        authed_request(
            "DELETE",
            &format!("/api/v1/reviews/{}", created["id"]),
            &token,
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::INTERNAL_SERVER_ERROR).await;
    let err: Value = read_json(res).await;
    assert_eq!(err["code"], "review_cannot_delete");
}

#[tokio::test]
async fn requests_carry_a_request_id_header() {
    let app = spawn_app();
    let res = send(&app.app, get_request("/api/v1/reviews")).await;
    assert!(res.headers().contains_key("x-request-id"));
}
