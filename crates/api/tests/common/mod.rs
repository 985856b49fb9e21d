//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use sha2::Sha256;
use sqlx::PgPool;
use tower::ServiceExt;

use lms_api::auth::jwt::{issue_session_token, JwtConfig};
use lms_api::config::{ServerConfig, ShopifyConfig};
use lms_api::router::build_app_router;
use lms_api::state::AppState;
use lms_db::models::user::{NewUser, User};
use lms_db::repositories::UserRepo;

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";
pub const API_SECRET: &str = "test-storefront-api-secret";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const LINK_SECRET: &str = "test-link-secret";
pub const FRONTEND_URL: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with every storefront secret configured.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![FRONTEND_URL.to_string()],
        frontend_url: FRONTEND_URL.to_string(),
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiry_days: 7,
        },
        shopify: ShopifyConfig {
            api_secret: Some(API_SECRET.to_string()),
            api_key: None,
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            link_secret: Some(LINK_SECRET.to_string()),
            allow_unsigned_login_links: false,
            placeholder_email_domain: "shopify.local".to_string(),
        },
    }
}

/// Build the full application router with the given config.
pub fn build_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(config),
    })
}

/// Build the full application router, with the production middleware
/// stack, using the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_config(pool, test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::put(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Webhook helpers
// ---------------------------------------------------------------------------

/// Base64 HMAC-SHA256 of `body`, as the storefront computes it.
pub fn sign_webhook(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Hex HMAC-SHA256 of `id|email` for login links.
pub fn sign_link(secret: &str, customer_id: &str, email: &str) -> String {
    let payload = format!("{customer_id}|{}", email.trim().to_lowercase());
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Deliver raw bytes to a webhook route with the given signature header.
pub async fn deliver_raw(
    app: Router,
    path: &str,
    topic: &str,
    body: Vec<u8>,
    signature: &str,
) -> Response<Body> {
    let request = Request::post(format!("/api/webhooks/shopify/{path}"))
        .header("content-type", "application/json")
        .header("x-shopify-hmac-sha256", signature)
        .header("x-shopify-shop-domain", "test-shop.myshopify.com")
        .header("x-shopify-topic", topic)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Deliver a correctly signed webhook.
pub async fn deliver(
    app: Router,
    path: &str,
    topic: &str,
    payload: &serde_json::Value,
) -> Response<Body> {
    let body = serde_json::to_vec(payload).unwrap();
    let signature = sign_webhook(WEBHOOK_SECRET, &body);
    deliver_raw(app, path, topic, body, &signature).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and return it with a valid session token.
pub async fn create_user_with_token(pool: &PgPool, customer_id: &str) -> (User, String) {
    let input = NewUser {
        shopify_customer_id: customer_id.to_string(),
        email: format!("{customer_id}@example.com"),
        name: format!("Customer {customer_id}"),
        first_name: None,
        last_name: None,
        phone: None,
        shopify_data: None,
    };
    let (user, _) = UserRepo::find_or_create(pool, &input)
        .await
        .expect("user creation should succeed");
    let token = issue_session_token(user.id, customer_id, &test_config().jwt).unwrap();
    (user, token)
}

pub fn product_payload(id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "body_html": "<p>Learn things</p>",
        "handle": title.to_lowercase().replace(' ', "-"),
        "images": [{ "src": format!("https://cdn.test/{id}.png") }],
    })
}

pub fn order_payload(order_id: i64, customer_id: i64, product_ids: &[i64]) -> serde_json::Value {
    let line_items: Vec<serde_json::Value> = product_ids
        .iter()
        .map(|pid| serde_json::json!({ "product_id": pid, "title": format!("Item {pid}") }))
        .collect();
    serde_json::json!({
        "id": order_id,
        "order_number": 1000 + order_id,
        "financial_status": "paid",
        "cancelled_at": null,
        "customer": {
            "id": customer_id,
            "email": " Buyer@Example.com ",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "phone": null,
        },
        "line_items": line_items,
    })
}
