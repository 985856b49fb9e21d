//! Handlers for the `/courses` resource.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use lms_core::error::CoreError;
use lms_core::shopify::optional_external_id;
use lms_core::types::DbId;
use lms_db::models::course::{Course, UpsertCourseDetails};
use lms_db::repositories::CourseRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /courses`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCourseRequest {
    #[serde(default, deserialize_with = "optional_external_id")]
    pub shopify_product_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub scorm_url: Option<String>,
    pub admission_id: Option<String>,
    pub shopify_data: Option<serde_json::Value>,
}

/// GET /api/courses
pub async fn list_courses(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<DataResponse<Course>>> {
    let Path(id) = path?;
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id,
        })?;
    Ok(Json(DataResponse { data: course }))
}

/// GET /api/courses/shopify/{productId}
///
/// Only active courses are visible through this lookup.
pub async fn get_course_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = CourseRepo::find_active_by_product_id(&state.pool, &product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No course for product {product_id}")))?;
    Ok(Json(DataResponse { data: course }))
}

/// POST /api/courses
///
/// Create or overwrite a course's player-facing details by product id.
pub async fn upsert_course(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpsertCourseRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Course>>> {
    let Json(input) = payload?;

    let (Some(shopify_product_id), Some(title)) = (
        input.shopify_product_id.filter(|v| !v.trim().is_empty()),
        input.title.filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(
            CoreError::BadRequest("shopifyProductId and title are required".into()).into(),
        );
    };

    let details = UpsertCourseDetails {
        shopify_product_id,
        title,
        description: input.description,
        thumbnail: input.thumbnail,
        scorm_url: input.scorm_url,
        admission_id: input.admission_id,
        shopify_data: input.shopify_data,
    };
    let course = CourseRepo::upsert_details(&state.pool, &details).await?;

    tracing::info!(course_id = course.id, user_id = auth.user_id, "Course details upserted");
    Ok(Json(DataResponse { data: course }))
}
