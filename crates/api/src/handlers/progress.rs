//! Handlers for the `/progress` resource.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use lms_core::error::CoreError;
use lms_core::progress::ProgressUpdate;
use lms_core::types::DbId;
use lms_db::models::progress::Progress;
use lms_db::repositories::ProgressRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::tracker::{owned_enrollment, record_progress};

/// Request body for `POST /progress`: the update plus its target enrollment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProgressRequest {
    pub enrollment_id: Option<DbId>,
    #[serde(flatten)]
    pub update: ProgressUpdate,
}

/// GET /api/progress/{enrollmentId}
pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<DataResponse<Progress>>> {
    let Path(enrollment_id) = path?;
    let enrollment = owned_enrollment(&state.pool, enrollment_id, auth.user_id).await?;
    let progress = ProgressRepo::find_by_enrollment(&state.pool, enrollment.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Progress not found".into()))?;
    Ok(Json(DataResponse { data: progress }))
}

/// POST /api/progress
///
/// Record a player update for the enrollment named in the body.
pub async fn post_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<RecordProgressRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Progress>>> {
    let Json(input) = payload?;
    let enrollment_id = input
        .enrollment_id
        .ok_or_else(|| CoreError::BadRequest("enrollmentId is required".into()))?;

    let progress = record_progress(&state.pool, enrollment_id, auth.user_id, input.update).await?;
    Ok(Json(DataResponse { data: progress }))
}

/// PUT /api/progress/{enrollmentId}
///
/// Same semantics as `POST /api/progress`, with the enrollment in the path.
pub async fn put_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<ProgressUpdate>, JsonRejection>,
) -> AppResult<Json<DataResponse<Progress>>> {
    let Path(enrollment_id) = path?;
    let Json(update) = payload?;
    let progress = record_progress(&state.pool, enrollment_id, auth.user_id, update).await?;
    Ok(Json(DataResponse { data: progress }))
}
