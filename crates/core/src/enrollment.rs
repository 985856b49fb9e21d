//! Enrollment status values and the allowed transitions between them.
//!
//! ```text
//! active ──first completion──▶ completed
//!   │                              │
//!   ├──────refund / cancel─────────┴──▶ cancelled
//!   └──────(reserved)──────────────────▶ expired
//! ```
//!
//! `cancelled` and `expired` are terminal.

use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_EXPIRED: &str = "expired";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid enrollment status strings, in lifecycle order.
pub const VALID_ENROLLMENT_STATUSES: &[&str] = &[
    STATUS_ACTIVE,
    STATUS_COMPLETED,
    STATUS_EXPIRED,
    STATUS_CANCELLED,
];

/// Statuses that a refund or cancellation moves to `cancelled`.
pub const CANCELLABLE_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_COMPLETED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Expired,
    Cancelled,
}

impl EnrollmentStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_EXPIRED => Ok(Self::Expired),
            STATUS_CANCELLED => Ok(Self::Cancelled),
            _ => Err(format!(
                "Invalid enrollment status '{s}'. Must be one of: {}",
                VALID_ENROLLMENT_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Completed => STATUS_COMPLETED,
            Self::Expired => STATUS_EXPIRED,
            Self::Cancelled => STATUS_CANCELLED,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Completed)
                | (Self::Active, Self::Cancelled)
                | (Self::Completed, Self::Cancelled)
                | (Self::Active, Self::Expired)
        )
    }
}

/// Whether an order update means the purchase no longer grants access.
pub fn order_revokes_access(financial_status: Option<&str>, cancelled_at: Option<&str>) -> bool {
    let refunded = financial_status.is_some_and(|s| s.eq_ignore_ascii_case("refunded"));
    let cancelled = cancelled_at.is_some_and(|s| !s.trim().is_empty());
    refunded || cancelled
}
