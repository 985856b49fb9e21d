use lms_core::identity::DEFAULT_PLACEHOLDER_EMAIL_DOMAIN;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Frontend base URL; login links redirect to `{frontend_url}/auth/callback`.
    pub frontend_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Storefront integration secrets and sync options.
    pub shopify: ShopifyConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3001`                     |
    /// | `FRONTEND_URL`         | `http://localhost:3000`    |
    /// | `CORS_ORIGINS`         | value of `FRONTEND_URL`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| frontend_url.clone())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            frontend_url,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            shopify: ShopifyConfig::from_env(),
        }
    }
}

/// Secrets and options for the storefront integration.
///
/// Every secret is optional at startup; an operation that needs a missing
/// secret fails with `Misconfigured` at request time.
#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// Key for storefront-issued session tokens (HS256).
    pub api_secret: Option<String>,
    /// Expected `aud` claim of storefront session tokens, when set.
    pub api_key: Option<String>,
    /// Key for webhook body signatures.
    pub webhook_secret: Option<String>,
    /// Key for legacy login-link signatures.
    pub link_secret: Option<String>,
    /// Accept unsigned login links when no link secret is configured.
    pub allow_unsigned_login_links: bool,
    /// Domain for synthesized `customer-<id>@<domain>` emails.
    pub placeholder_email_domain: String,
}

impl ShopifyConfig {
    /// Load storefront configuration from environment variables.
    ///
    /// | Env Var                      | Default                          |
    /// |------------------------------|----------------------------------|
    /// | `SHOPIFY_API_SECRET`         | --                               |
    /// | `SHOPIFY_API_KEY`            | --                               |
    /// | `SHOPIFY_WEBHOOK_SECRET`     | value of `SHOPIFY_API_SECRET`    |
    /// | `SHOPIFY_LINK_SECRET`        | value of `SHOPIFY_WEBHOOK_SECRET`|
    ///
    /// The link secret only inherits an explicitly set webhook secret. It
    /// never falls through to `SHOPIFY_API_SECRET`.
    /// | `ALLOW_UNSIGNED_LOGIN_LINKS` | `false`                          |
    /// | `PLACEHOLDER_EMAIL_DOMAIN`   | `shopify.local`                  |
    pub fn from_env() -> Self {
        let api_secret = non_empty_var("SHOPIFY_API_SECRET");
        let api_key = non_empty_var("SHOPIFY_API_KEY");
        let (webhook_secret, link_secret) = resolve_signing_secrets(
            api_secret.as_deref(),
            non_empty_var("SHOPIFY_WEBHOOK_SECRET"),
            non_empty_var("SHOPIFY_LINK_SECRET"),
        );

        let allow_unsigned_login_links = std::env::var("ALLOW_UNSIGNED_LOGIN_LINKS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let placeholder_email_domain = non_empty_var("PLACEHOLDER_EMAIL_DOMAIN")
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_EMAIL_DOMAIN.to_string());

        Self {
            api_secret,
            api_key,
            webhook_secret,
            link_secret,
            allow_unsigned_login_links,
            placeholder_email_domain,
        }
    }
}

/// Read an env var, treating unset and blank the same.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve `(webhook_secret, link_secret)` from the raw env values.
fn resolve_signing_secrets(
    api_secret: Option<&str>,
    webhook_secret: Option<String>,
    link_secret: Option<String>,
) -> (Option<String>, Option<String>) {
    let link_secret = link_secret.or_else(|| webhook_secret.clone());
    let webhook_secret = webhook_secret.or_else(|| api_secret.map(str::to_string));
    (webhook_secret, link_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_secret_defaults_to_api_secret() {
        let (webhook, link) = resolve_signing_secrets(Some("api"), None, None);
        assert_eq!(webhook.as_deref(), Some("api"));
        assert_eq!(link, None);
    }

    #[test]
    fn link_secret_inherits_explicit_webhook_secret() {
        let (webhook, link) = resolve_signing_secrets(Some("api"), Some("hook".into()), None);
        assert_eq!(webhook.as_deref(), Some("hook"));
        assert_eq!(link.as_deref(), Some("hook"));
    }

    #[test]
    fn explicit_link_secret_wins() {
        let (_, link) =
            resolve_signing_secrets(Some("api"), Some("hook".into()), Some("link".into()));
        assert_eq!(link.as_deref(), Some("link"));
    }
}
