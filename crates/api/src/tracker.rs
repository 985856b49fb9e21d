//! Progress tracking for course-player updates.

use lms_core::enrollment::EnrollmentStatus;
use lms_core::error::CoreError;
use lms_core::progress::{apply_update, ProgressUpdate};
use lms_core::types::DbId;
use lms_db::models::enrollment::Enrollment;
use lms_db::models::progress::Progress;
use lms_db::repositories::{EnrollmentRepo, ProgressRepo};
use sqlx::PgPool;

use crate::error::AppResult;

/// Load an enrollment and check that `user_id` owns it.
pub async fn owned_enrollment(
    pool: &PgPool,
    enrollment_id: DbId,
    user_id: DbId,
) -> AppResult<Enrollment> {
    let enrollment = EnrollmentRepo::find_by_id(pool, enrollment_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Enrollment",
            id: enrollment_id,
        })?;

    if !enrollment.is_owned_by(user_id) {
        return Err(CoreError::Forbidden("Access denied".into()).into());
    }
    Ok(enrollment)
}

/// Apply a player update to an enrollment's progress.
///
/// The progress row is locked for the whole read-merge-write, so concurrent
/// updates to one enrollment apply in sequence and no `timeSpent` increment
/// is lost. A missing progress row is created first. The first update that
/// completes the course also moves an `active` enrollment to `completed`,
/// in the same transaction.
pub async fn record_progress(
    pool: &PgPool,
    enrollment_id: DbId,
    user_id: DbId,
    update: ProgressUpdate,
) -> AppResult<Progress> {
    update.validate().map_err(CoreError::BadRequest)?;

    let enrollment = owned_enrollment(pool, enrollment_id, user_id).await?;

    let mut tx = pool.begin().await?;

    let current = match ProgressRepo::find_by_enrollment_for_update(&mut *tx, enrollment.id).await? {
        Some(progress) => progress,
        None => {
            tracing::warn!(enrollment_id = enrollment.id, "Progress missing, creating it");
            match ProgressRepo::insert_initial(&mut *tx, &enrollment).await? {
                Some(progress) => progress,
                // Created concurrently; lock the winner's row.
                None => ProgressRepo::find_by_enrollment_for_update(&mut *tx, enrollment.id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?,
            }
        }
    };

    let applied = apply_update(current.fields(), update);
    let saved = ProgressRepo::save_fields(&mut *tx, current.id, &applied.fields).await?;

    if applied.first_completion {
        let completable = enrollment
            .status()
            .is_ok_and(|status| status.can_transition_to(EnrollmentStatus::Completed));
        let completed = if completable {
            EnrollmentRepo::mark_completed(&mut *tx, enrollment.id).await?
        } else {
            None
        };
        match completed {
            Some(_) => {
                tracing::info!(enrollment_id = enrollment.id, user_id, "Enrollment completed")
            }
            None => tracing::debug!(
                enrollment_id = enrollment.id,
                status = %enrollment.status,
                "Course completed on an enrollment that is not active",
            ),
        }
    }

    tx.commit().await?;
    Ok(saved)
}
