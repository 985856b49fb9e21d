//! HMAC-SHA256 signature primitives for webhooks and login links.
//!
//! Verification always goes through [`Mac::verify_slice`], which compares in
//! constant time and rejects tags of the wrong length without early exit on
//! content.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length")
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

/// Compute the base64-encoded HMAC-SHA256 of a raw webhook body.
///
/// The storefront signs the exact bytes it sent; callers must pass the
/// original request body, never a re-serialized JSON value.
pub fn compute_webhook_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = mac_for(secret);
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verify a base64 webhook signature header against the raw body.
///
/// Returns `false` for malformed base64, wrong-length tags, and mismatches.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature_b64: &str) -> bool {
    let Ok(provided) = BASE64.decode(signature_b64.trim()) else {
        return false;
    };
    let mut mac = mac_for(secret);
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

// ---------------------------------------------------------------------------
// Login links
// ---------------------------------------------------------------------------

/// Canonical string signed for a login link: `id|lowercased-trimmed-email`.
pub fn link_signature_payload(customer_id: &str, email: &str) -> String {
    format!("{customer_id}|{}", email.trim().to_lowercase())
}

/// Compute the hex-encoded link signature for a customer id and email.
pub fn compute_link_signature(secret: &str, customer_id: &str, email: &str) -> String {
    let mut mac = mac_for(secret);
    mac.update(link_signature_payload(customer_id, email).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex link signature.
///
/// Returns `false` for malformed hex, wrong-length tags, and mismatches.
pub fn verify_link_signature(secret: &str, customer_id: &str, email: &str, signature_hex: &str) -> bool {
    let Ok(provided) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let mut mac = mac_for(secret);
    mac.update(link_signature_payload(customer_id, email).as_bytes());
    mac.verify_slice(&provided).is_ok()
}
