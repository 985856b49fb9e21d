//! Course entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: DbId,
    pub shopify_product_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub handle: Option<String>,
    pub scorm_url: Option<String>,
    pub admission_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub is_active: bool,
    pub total_lessons: i32,
    pub estimated_duration_mins: Option<i32>,
    #[serde(skip_serializing)]
    pub shopify_data: Option<serde_json::Value>,
    pub last_synced_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact course view embedded in enrollment listings.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: DbId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub scorm_url: Option<String>,
    pub admission_id: Option<String>,
}

/// Fields written by a storefront product webhook. All are replaced on update.
#[derive(Debug, Clone)]
pub struct SyncCourse {
    pub shopify_product_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub handle: Option<String>,
    pub shopify_data: Option<serde_json::Value>,
}

/// Fields written by the authenticated course upsert endpoint.
#[derive(Debug, Clone)]
pub struct UpsertCourseDetails {
    pub shopify_product_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub scorm_url: Option<String>,
    pub admission_id: Option<String>,
    pub shopify_data: Option<serde_json::Value>,
}
