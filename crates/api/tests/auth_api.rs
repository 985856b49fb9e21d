//! HTTP-level integration tests for storefront login and login links.

mod common;

use axum::body::Body;
use axum::http::header::LOCATION;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_app_with_config, create_user_with_token, get, get_auth, post_json, send,
    sign_link, test_config, API_SECRET, FRONTEND_URL, LINK_SECRET,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use lms_api::auth::jwt::validate_token;
use lms_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

fn storefront_token(claims: serde_json::Value) -> String {
    let mut claims = claims;
    claims["exp"] = json!(chrono::Utc::now().timestamp() + 600);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(API_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Pull the session token out of a login-link redirect.
fn redirected_token(location: &str) -> String {
    let prefix = format!("{FRONTEND_URL}/auth/callback?lmsToken=");
    let encoded = location
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("unexpected redirect target: {location}"));
    urlencoding::decode(encoded).unwrap().into_owned()
}

// ---------------------------------------------------------------------------
// POST /auth/shopify-verify
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_shopify_verify_creates_user_from_token(pool: PgPool) {
    let token = storefront_token(json!({
        "sub": "gid://shopify/Customer/321",
        "email": "Learner@Example.com",
        "first_name": "Grace",
        "last_name": "Hopper",
    }));
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/auth/shopify-verify", json!({ "token": token })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["shopifyCustomerId"], "321");
    assert_eq!(json["user"]["email"], "learner@example.com");
    assert_eq!(json["user"]["name"], "Grace Hopper");

    let claims = validate_token(json["token"].as_str().unwrap(), &test_config().jwt).unwrap();
    assert_eq!(claims.shopify_customer_id, "321");
    assert_eq!(json["user"]["id"], claims.sub);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_shopify_verify_accepts_bearer_header(pool: PgPool) {
    let token = storefront_token(json!({ "sub": "55" }));
    let app = common::build_test_app(pool.clone());

    let request = Request::post("/api/auth/shopify-verify")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "customer-55@shopify.local");
    assert_eq!(json["user"]["name"], "Customer 55");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_shopify_verify_returns_existing_user(pool: PgPool) {
    let (existing, _) = create_user_with_token(&pool, "77").await;
    let token = storefront_token(json!({ "sub": "77", "email": "new@example.com" }));
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/auth/shopify-verify", json!({ "token": token })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], existing.id);
    assert_eq!(json["user"]["email"], existing.email);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_shopify_verify_without_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/shopify-verify", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_shopify_verify_rejects_forged_token(pool: PgPool) {
    let forged = encode(
        &Header::default(),
        &json!({ "sub": "1", "exp": chrono::Utc::now().timestamp() + 600 }),
        &EncodingKey::from_secret(b"not-the-api-secret"),
    )
    .unwrap();
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/auth/shopify-verify", json!({ "token": forged })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(UserRepo::find_by_customer_id(&pool, "1").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// GET /auth/me and POST /auth/sync-user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_returns_profile(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "90").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["shopifyCustomerId"], "90");
    assert!(json.get("shopifyData").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_valid_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    assert_eq!(get(app, "/api/auth/me").await.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sync_user_refreshes_existing_profile(pool: PgPool) {
    let (user, _) = create_user_with_token(&pool, "88").await;
    let token = storefront_token(json!({
        "sub": "88",
        "email": "Fresh@Example.com",
        "first_name": "Fresh",
    }));
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/auth/sync-user", json!({ "shopifyToken": token })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["email"], "fresh@example.com");
    assert_eq!(json["user"]["name"], "Fresh");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sync_user_never_creates_users(pool: PgPool) {
    let token = storefront_token(json!({ "sub": "12345", "email": "ghost@example.com" }));
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/auth/sync-user", json!({ "shopifyToken": token })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(UserRepo::find_by_customer_id(&pool, "12345").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Login links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_signed_login_link_redirects_with_session(pool: PgPool) {
    let signature = sign_link(LINK_SECRET, "4242", "Link@Example.com");
    let uri = format!(
        "/api/auth/shopify-customer-login?customerId=4242&email={}&signature={signature}",
        urlencoding::encode("Link@Example.com")
    );
    let app = common::build_test_app(pool.clone());

    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[LOCATION].to_str().unwrap().to_string();
    let claims = validate_token(&redirected_token(&location), &test_config().jwt).unwrap();
    assert_eq!(claims.shopify_customer_id, "4242");

    let user = UserRepo::find_by_customer_id(&pool, "4242").await.unwrap().unwrap();
    assert_eq!(user.id, claims.sub);
    assert_eq!(user.email, "link@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_link_with_bad_signature_is_unauthorized(pool: PgPool) {
    let signature = sign_link(LINK_SECRET, "4242", "someone-else@example.com");
    let uri = format!(
        "/api/auth/shopify-customer-login?customerId=4242&email=link%40example.com&signature={signature}"
    );
    let app = common::build_test_app(pool.clone());

    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(UserRepo::find_by_customer_id(&pool, "4242").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_link_missing_params_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/auth/shopify-customer-login?customerId=4242").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_path_style_login_link(pool: PgPool) {
    let signature = sign_link(LINK_SECRET, "808", "path@example.com");
    let uri = format!("/api/courses/user/808/path%40example.com?signature={signature}");
    let app = common::build_test_app(pool.clone());

    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let user = UserRepo::find_by_customer_id(&pool, "808").await.unwrap().unwrap();
    assert_eq!(user.email, "path@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_link_without_secret_is_refused(pool: PgPool) {
    let mut config = test_config();
    config.shopify.link_secret = None;
    let app = build_app_with_config(pool.clone(), config);

    let response = get(
        app,
        "/api/auth/shopify-customer-login?customerId=1&email=a%40b.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "MISCONFIGURED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unsigned_login_link_when_allowed(pool: PgPool) {
    let mut config = test_config();
    config.shopify.link_secret = None;
    config.shopify.allow_unsigned_login_links = true;
    let app = build_app_with_config(pool.clone(), config);

    let response = get(
        app,
        "/api/auth/shopify-customer-login?customerId=gid%3A%2F%2Fshopify%2FCustomer%2F9&email=",
    )
    .await;

    // Blank email counts as missing.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut config = test_config();
    config.shopify.link_secret = None;
    config.shopify.allow_unsigned_login_links = true;
    let app = build_app_with_config(pool.clone(), config);
    let response = get(
        app,
        "/api/auth/shopify-customer-login?customerId=gid%3A%2F%2Fshopify%2FCustomer%2F9&email=nine%40example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(UserRepo::find_by_customer_id(&pool, "9").await.unwrap().is_some());
}
