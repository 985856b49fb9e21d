//! Handlers for the `/auth` resource (storefront login, login links, profile).

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lms_core::error::CoreError;
use lms_core::signature::verify_link_signature;
use lms_core::types::DbId;
use lms_db::models::user::User;
use lms_db::repositories::UserRepo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::storefront::verify_storefront_token;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::state::AppState;
use crate::sync::customer::{
    find_or_create_user, login_with_storefront_identity, refresh_from_storefront_identity,
};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Optional body for `POST /auth/shopify-verify`.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

/// Optional body for `POST /auth/sync-user`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    pub shopify_token: Option<String>,
}

/// Query string of a signed login link.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLinkQuery {
    pub customer_id: Option<String>,
    pub email: Option<String>,
    pub signature: Option<String>,
}

/// Query string of the path-style login link.
#[derive(Debug, Deserialize)]
pub struct SignatureQuery {
    pub signature: Option<String>,
}

/// Response of a successful storefront-token login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Response of `POST /auth/sync-user`.
#[derive(Debug, Serialize)]
pub struct SyncUserResponse {
    pub user: UserSummary,
}

/// Public user info embedded in auth responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub shopify_customer_id: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            shopify_customer_id: user.shopify_customer_id.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/shopify-verify
///
/// Exchange a storefront session token (body `token` or bearer header) for a
/// session token, creating the user on first login.
pub async fn shopify_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<AuthResponse>> {
    let input: VerifyRequest = optional_json(&body)?;
    let token = input
        .token
        .as_deref()
        .or_else(|| bearer_token(&headers))
        .ok_or_else(|| CoreError::Unauthenticated("Missing storefront session token".into()))?;

    let identity = verify_storefront_token(token, &state.config.shopify)?;
    let session = login_with_storefront_identity(&state.pool, &identity, &state.config).await?;

    Ok(Json(AuthResponse {
        user: UserSummary::from(&session.user),
        token: session.token,
    }))
}

/// GET /api/auth/shopify-customer-login?customerId=&email=&signature=
///
/// Verify a signed login link and redirect to the frontend callback with a
/// session token.
pub async fn shopify_customer_login(
    State(state): State<AppState>,
    Query(query): Query<LoginLinkQuery>,
) -> AppResult<Response> {
    let (Some(customer_id), Some(email)) = (
        query.customer_id.filter(|v| !v.trim().is_empty()),
        query.email.filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(CoreError::BadRequest("Missing customerId or email".into()).into());
    };

    link_login(&state, &customer_id, &email, query.signature.as_deref()).await
}

/// GET /api/courses/user/{customerId}/{email}?signature=
///
/// Path-style form of the login link, kept for links already published in
/// storefront themes.
pub async fn legacy_customer_login(
    State(state): State<AppState>,
    Path((customer_id, email)): Path<(String, String)>,
    Query(query): Query<SignatureQuery>,
) -> AppResult<Response> {
    link_login(&state, &customer_id, &email, query.signature.as_deref()).await
}

/// GET /api/auth/me
///
/// Return the caller's profile.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    Ok(Json(user))
}

/// POST /api/auth/sync-user
///
/// Refresh an existing user's profile from a storefront session token
/// (body `shopifyToken` or bearer header). Never creates users.
pub async fn sync_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<SyncUserResponse>> {
    let input: SyncUserRequest = optional_json(&body)?;
    let token = input
        .shopify_token
        .as_deref()
        .or_else(|| bearer_token(&headers))
        .ok_or_else(|| CoreError::Unauthenticated("Missing token".into()))?;

    let identity = verify_storefront_token(token, &state.config.shopify)?;
    let user = refresh_from_storefront_identity(&state.pool, &identity)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(SyncUserResponse {
        user: UserSummary::from(&user),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn link_login(
    state: &AppState,
    customer_id: &str,
    email: &str,
    signature: Option<&str>,
) -> AppResult<Response> {
    check_link_signature(&state.config, customer_id, email, signature)?;

    let session = find_or_create_user(&state.pool, customer_id, email, &state.config).await?;
    Ok(redirect_with_token(&state.config.frontend_url, &session.token))
}

/// Enforce the login-link signature policy.
///
/// With a link secret configured the signature is mandatory. Without one,
/// links are accepted only when unsigned links are explicitly allowed.
pub fn check_link_signature(
    config: &ServerConfig,
    customer_id: &str,
    email: &str,
    signature: Option<&str>,
) -> Result<(), CoreError> {
    match config.shopify.link_secret.as_deref() {
        Some(secret) => {
            let valid = signature
                .is_some_and(|sig| verify_link_signature(secret, customer_id, email, sig));
            if valid {
                Ok(())
            } else {
                Err(CoreError::Unauthenticated(
                    "Invalid or missing link signature".into(),
                ))
            }
        }
        None if config.shopify.allow_unsigned_login_links => {
            tracing::warn!(customer_id, "Accepting unsigned login link");
            Ok(())
        }
        None => Err(CoreError::Misconfigured(
            "Login link secret not configured".into(),
        )),
    }
}

/// 302 to `{frontend}/auth/callback?lmsToken=<token>`.
fn redirect_with_token(frontend_url: &str, token: &str) -> Response {
    let location = format!(
        "{frontend_url}/auth/callback?lmsToken={}",
        urlencoding::encode(token)
    );
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// Parse an optional JSON body; an empty body yields the default value.
fn optional_json<T: DeserializeOwned + Default>(body: &[u8]) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| CoreError::BadRequest(format!("Invalid JSON body: {e}")).into())
}
