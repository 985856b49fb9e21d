//! Verification of session tokens issued by the storefront.
//!
//! The storefront signs its customer session tokens with the app's API secret
//! using HS256. The algorithm is pinned; tokens signed any other way are
//! rejected. When `SHOPIFY_API_KEY` is configured the `aud` claim must match
//! it, otherwise the audience is not checked.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use lms_core::error::CoreError;
use lms_core::identity::{display_name, normalize_customer_id};
use lms_core::shopify::optional_external_id;
use serde::Deserialize;

use crate::config::ShopifyConfig;

/// Customer identity asserted by a verified storefront token.
#[derive(Debug, Clone)]
pub struct StorefrontIdentity {
    /// Normalized customer id from the `sub` claim.
    pub customer_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    /// Every claim in the token, kept as the user's snapshot.
    pub claims: serde_json::Value,
}

impl StorefrontIdentity {
    /// `first last`, or `None` when the token carries neither.
    pub fn display_name(&self) -> Option<String> {
        display_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProfileClaims {
    #[serde(default, deserialize_with = "optional_external_id")]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

/// Verify a storefront session token and extract the customer it names.
///
/// Fails with `Misconfigured` when no API secret is set, and with
/// `Unauthenticated` when the token does not verify or has no subject.
pub fn verify_storefront_token(
    token: &str,
    config: &ShopifyConfig,
) -> Result<StorefrontIdentity, CoreError> {
    let secret = config.api_secret.as_deref().ok_or_else(|| {
        CoreError::Misconfigured("Storefront API secret not configured".into())
    })?;

    let mut validation = Validation::new(Algorithm::HS256);
    match config.api_key.as_deref() {
        Some(api_key) => validation.set_audience(&[api_key]),
        None => validation.validate_aud = false,
    }

    let claims = decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Storefront token rejected");
        CoreError::Unauthenticated("Invalid or expired storefront token".into())
    })?
    .claims;

    let profile: ProfileClaims = serde_json::from_value(claims.clone())
        .map_err(|_| CoreError::Unauthenticated("Malformed storefront token claims".into()))?;

    let customer_id = profile
        .sub
        .as_deref()
        .and_then(normalize_customer_id)
        .ok_or_else(|| CoreError::Unauthenticated("Token missing customer id (sub)".into()))?;

    Ok(StorefrontIdentity {
        customer_id,
        email: non_blank(profile.email),
        first_name: non_blank(profile.first_name.or(profile.given_name)),
        last_name: non_blank(profile.last_name.or(profile.family_name)),
        phone: non_blank(profile.phone),
        claims,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
