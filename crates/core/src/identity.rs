//! Customer identity normalization.
//!
//! The storefront refers to customers either by a bare numeric id (`"42"`)
//! or by a URI-style global id (`"gid://shopify/Customer/42"`). Every lookup
//! and insert goes through [`normalize_customer_id`] so both forms resolve to
//! the same user row.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `scheme://segment/.../last` and captures the final path segment.
const GLOBAL_ID_PATTERN: &str = r"(?i)^[a-z][a-z0-9+.\-]*://(?:[^/]+/)+([^/]+)$";

static GLOBAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GLOBAL_ID_PATTERN).expect("valid regex"));

/// Default domain used for synthesized placeholder emails.
pub const DEFAULT_PLACEHOLDER_EMAIL_DOMAIN: &str = "shopify.local";

/// Strip any URI-style global-id prefix, returning the bare identifier.
///
/// Returns `None` when the input is empty after trimming.
pub fn normalize_customer_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let bare = GLOBAL_ID_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    Some(bare.to_string())
}

/// Trim and lowercase an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Synthesized email for customers that arrive without one.
pub fn placeholder_email(customer_id: &str, domain: &str) -> String {
    format!("customer-{customer_id}@{domain}")
}

/// Synthesized display name for customers that arrive without a name.
pub fn placeholder_name(customer_id: &str) -> String {
    format!("Customer {customer_id}")
}

/// Join first and last name into a display name.
///
/// Returns `None` when both parts are missing or blank.
pub fn display_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Resolve the email to store for a customer: the normalized input when
/// present and non-blank, otherwise a placeholder.
pub fn email_or_placeholder(email: Option<&str>, customer_id: &str, domain: &str) -> String {
    email
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| placeholder_email(customer_id, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_is_unchanged() {
        assert_eq!(normalize_customer_id("42").as_deref(), Some("42"));
        assert_eq!(normalize_customer_id("  42 ").as_deref(), Some("42"));
    }

    #[test]
    fn global_id_is_stripped() {
        assert_eq!(
            normalize_customer_id("gid://shopify/Customer/7281").as_deref(),
            Some("7281")
        );
        assert_eq!(
            normalize_customer_id("GID://Shopify/Customer/7281").as_deref(),
            Some("7281")
        );
    }

    #[test]
    fn non_numeric_subject_is_kept_verbatim() {
        assert_eq!(
            normalize_customer_id("cust_abc").as_deref(),
            Some("cust_abc")
        );
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(normalize_customer_id(""), None);
        assert_eq!(normalize_customer_id("   "), None);
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  A@B.com "), "a@b.com");
    }

    #[test]
    fn missing_email_gets_placeholder() {
        assert_eq!(
            email_or_placeholder(None, "9", DEFAULT_PLACEHOLDER_EMAIL_DOMAIN),
            "customer-9@shopify.local"
        );
        assert_eq!(
            email_or_placeholder(Some("  "), "9", "example.test"),
            "customer-9@example.test"
        );
        assert_eq!(
            email_or_placeholder(Some("Jo@X.io"), "9", "example.test"),
            "jo@x.io"
        );
    }

    #[test]
    fn display_name_joins_non_blank_parts() {
        assert_eq!(
            display_name(Some("Ada"), Some("Lovelace")).as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(display_name(Some("Ada"), None).as_deref(), Some("Ada"));
        assert_eq!(display_name(Some(" "), Some("")), None);
        assert_eq!(display_name(None, None), None);
    }

    #[test]
    fn placeholder_name_uses_id() {
        assert_eq!(placeholder_name("12"), "Customer 12");
    }
}
