//! Typed views of the storefront webhook payloads.
//!
//! Only the fields the sync logic reads are modelled. The full payload is
//! kept separately as an opaque snapshot by the caller.
//!
//! The storefront serializes ids as JSON numbers in webhooks but as strings
//! in other places, so every external id goes through [`external_id`], which
//! accepts either and yields a `String`.

use serde::{Deserialize, Deserializer};

/// Header carrying the base64 HMAC of the raw body.
pub const HEADER_HMAC: &str = "x-shopify-hmac-sha256";
/// Header naming the shop that sent the webhook.
pub const HEADER_SHOP_DOMAIN: &str = "x-shopify-shop-domain";
/// Header naming the webhook topic (e.g. `orders/create`).
pub const HEADER_TOPIC: &str = "x-shopify-topic";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Deserialize a required id that may be a JSON number or string.
pub fn external_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Deserialize an optional id that may be a JSON number, string, or null.
pub fn optional_external_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerPayload {
    #[serde(deserialize_with = "external_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    #[serde(deserialize_with = "external_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl ProductPayload {
    /// URL of the first product image, used as the course thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().and_then(|img| img.src.as_deref())
    }

    /// Storefront handle, with blank values treated as absent.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    /// Absent for custom line items that are not backed by a product.
    #[serde(default, deserialize_with = "optional_external_id")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderPayload {
    #[serde(deserialize_with = "external_id")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_external_id")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerPayload>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
}
