//! Handlers for the `/enrollments` resource.
//!
//! Enrollments are created only by order webhooks; these endpoints read them.

use std::collections::HashMap;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use lms_core::types::DbId;
use lms_db::models::course::{Course, CourseSummary};
use lms_db::models::enrollment::Enrollment;
use lms_db::models::progress::Progress;
use lms_db::repositories::{CourseRepo, EnrollmentRepo, ProgressRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::tracker::owned_enrollment;

/// An enrollment with its course and progress, as listed for the caller.
#[derive(Debug, Serialize)]
pub struct EnrollmentView<C: Serialize> {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Option<C>,
    pub progress: Option<Progress>,
}

/// GET /api/enrollments
///
/// The caller's enrollments, newest first, each with a course summary.
pub async fn list_enrollments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EnrollmentView<CourseSummary>>>>> {
    let enrollments = EnrollmentRepo::list_for_user(&state.pool, auth.user_id).await?;

    let enrollment_ids: Vec<DbId> = enrollments.iter().map(|e| e.id).collect();
    let mut course_ids: Vec<DbId> = enrollments.iter().map(|e| e.course_id).collect();
    course_ids.sort_unstable();
    course_ids.dedup();

    let courses: HashMap<DbId, CourseSummary> = CourseRepo::list_summaries(&state.pool, &course_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let mut progress: HashMap<DbId, Progress> =
        ProgressRepo::list_for_enrollments(&state.pool, &enrollment_ids)
            .await?
            .into_iter()
            .map(|p| (p.enrollment_id, p))
            .collect();

    let data = enrollments
        .into_iter()
        .map(|enrollment| EnrollmentView {
            course: courses.get(&enrollment.course_id).cloned(),
            progress: progress.remove(&enrollment.id),
            enrollment,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/enrollments/{id}
pub async fn get_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<DataResponse<EnrollmentView<Course>>>> {
    let Path(id) = path?;
    let enrollment = owned_enrollment(&state.pool, id, auth.user_id).await?;
    let course = CourseRepo::find_by_id(&state.pool, enrollment.course_id).await?;
    let progress = ProgressRepo::find_by_enrollment(&state.pool, enrollment.id).await?;

    Ok(Json(DataResponse {
        data: EnrollmentView {
            enrollment,
            course,
            progress,
        },
    }))
}
