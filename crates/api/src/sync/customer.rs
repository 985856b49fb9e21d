use lms_core::error::CoreError;
use lms_core::identity::{
    display_name, email_or_placeholder, normalize_customer_id, normalize_email, placeholder_email,
    placeholder_name,
};
use lms_core::shopify::CustomerPayload;
use lms_db::models::user::{CustomerFields, NewUser, User};
use lms_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::jwt::issue_session_token;
use crate::auth::storefront::StorefrontIdentity;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// A resolved user together with a freshly issued session token.
#[derive(Debug)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
}

/// Insert or refresh the user for a storefront customer payload.
///
/// Fields missing from the payload keep their stored values; a new user
/// without an email or name gets placeholders. `snapshot` replaces the
/// stored customer snapshot.
pub async fn sync_customer(
    pool: &PgPool,
    customer: &CustomerPayload,
    snapshot: Option<serde_json::Value>,
    config: &ServerConfig,
) -> AppResult<User> {
    let customer_id = normalize_customer_id(&customer.id)
        .ok_or_else(|| CoreError::BadRequest("Customer payload has no id".into()))?;

    let fields = CustomerFields {
        email: customer
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty()),
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        name: display_name(customer.first_name.as_deref(), customer.last_name.as_deref()),
        phone: customer.phone.clone(),
        shopify_data: snapshot,
    };

    let domain = &config.shopify.placeholder_email_domain;
    let user = UserRepo::upsert_customer(
        pool,
        &customer_id,
        &fields,
        &placeholder_email(&customer_id, domain),
        &placeholder_name(&customer_id),
    )
    .await?;

    tracing::debug!(user_id = user.id, customer_id = %customer_id, "Customer synced");
    Ok(user)
}

/// Resolve the user for a signed login link and issue a session token.
///
/// An existing user is returned unchanged; a missing one is created with a
/// placeholder name, and a placeholder email when `email` is blank.
pub async fn find_or_create_user(
    pool: &PgPool,
    raw_customer_id: &str,
    email: &str,
    config: &ServerConfig,
) -> AppResult<LoginSession> {
    let customer_id = normalize_customer_id(raw_customer_id)
        .ok_or_else(|| CoreError::BadRequest("Missing customerId".into()))?;

    let input = NewUser {
        email: email_or_placeholder(
            Some(email),
            &customer_id,
            &config.shopify.placeholder_email_domain,
        ),
        name: placeholder_name(&customer_id),
        shopify_customer_id: customer_id,
        first_name: None,
        last_name: None,
        phone: None,
        shopify_data: None,
    };

    resolve_and_issue(pool, &input, config).await
}

/// Resolve the user named by a verified storefront token and issue a
/// session token. A new user is populated from the token's claims.
pub async fn login_with_storefront_identity(
    pool: &PgPool,
    identity: &StorefrontIdentity,
    config: &ServerConfig,
) -> AppResult<LoginSession> {
    let customer_id = &identity.customer_id;
    let input = NewUser {
        shopify_customer_id: customer_id.clone(),
        email: email_or_placeholder(
            identity.email.as_deref(),
            customer_id,
            &config.shopify.placeholder_email_domain,
        ),
        name: identity
            .display_name()
            .unwrap_or_else(|| placeholder_name(customer_id)),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        phone: identity.phone.clone(),
        shopify_data: Some(identity.claims.clone()),
    };

    resolve_and_issue(pool, &input, config).await
}

/// Refresh an existing user's profile from a verified storefront token.
///
/// Returns `None` when no user has the token's customer id.
pub async fn refresh_from_storefront_identity(
    pool: &PgPool,
    identity: &StorefrontIdentity,
) -> AppResult<Option<User>> {
    let fields = CustomerFields {
        email: identity.email.as_deref().map(normalize_email),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        name: identity.display_name(),
        phone: identity.phone.clone(),
        shopify_data: Some(identity.claims.clone()),
    };

    Ok(UserRepo::update_profile(pool, &identity.customer_id, &fields).await?)
}

async fn resolve_and_issue(
    pool: &PgPool,
    input: &NewUser,
    config: &ServerConfig,
) -> AppResult<LoginSession> {
    let (user, created) = UserRepo::find_or_create(pool, input).await?;
    if created {
        tracing::info!(user_id = user.id, customer_id = %user.shopify_customer_id, "User created at login");
    }

    let token = issue_session_token(user.id, &user.shopify_customer_id, &config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to issue session token: {e}")))?;

    Ok(LoginSession { user, token })
}
