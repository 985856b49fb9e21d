//! Enrollment entity model and DTOs.

use lms_core::enrollment::EnrollmentStatus;
use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full enrollment row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub shopify_order_id: String,
    pub shopify_order_number: Option<String>,
    pub shopify_product_id: String,
    pub status: String,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub order_data: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Enrollment {
    /// Parsed status. The `ck_enrollments_status` constraint keeps this valid.
    pub fn status(&self) -> Result<EnrollmentStatus, String> {
        EnrollmentStatus::from_str_value(&self.status)
    }

    pub fn is_owned_by(&self, user_id: DbId) -> bool {
        self.user_id == user_id
    }
}

/// DTO for creating an enrollment from an order line item.
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: DbId,
    pub course_id: DbId,
    pub shopify_order_id: String,
    pub shopify_order_number: Option<String>,
    pub shopify_product_id: String,
    pub order_data: Option<serde_json::Value>,
}
