//! Repository for the `progress` table.

use lms_core::player_state::PlayerState;
use lms_core::progress::ProgressFields;
use lms_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::enrollment::Enrollment;
use crate::models::progress::Progress;

const COLUMNS: &str = "id, enrollment_id, course_id, user_id, progress, completed, time_spent, \
                        last_accessed_at, player_state, certificate, created_at, updated_at";

/// Provides lookup and update operations for progress records.
pub struct ProgressRepo;

impl ProgressRepo {
    pub async fn find_by_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE enrollment_id = $1");
        sqlx::query_as::<_, Progress>(&query)
            .bind(enrollment_id)
            .fetch_optional(pool)
            .await
    }

    /// Load the progress records for a set of enrollments.
    pub async fn list_for_enrollments(
        pool: &PgPool,
        enrollment_ids: &[DbId],
    ) -> Result<Vec<Progress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE enrollment_id = ANY($1)");
        sqlx::query_as::<_, Progress>(&query)
            .bind(enrollment_ids)
            .fetch_all(pool)
            .await
    }

    /// Insert the zeroed progress record for an enrollment.
    ///
    /// Returns `None` if the enrollment already has one.
    pub async fn insert_initial(
        conn: &mut PgConnection,
        enrollment: &Enrollment,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (enrollment_id, course_id, user_id, player_state) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_progress_enrollment_id DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(enrollment.id)
            .bind(enrollment.course_id)
            .bind(enrollment.user_id)
            .bind(Json(PlayerState::default()))
            .fetch_optional(conn)
            .await
    }

    /// Load an enrollment's progress and lock the row until the surrounding
    /// transaction ends, so concurrent updates apply one after another.
    pub async fn find_by_enrollment_for_update(
        conn: &mut PgConnection,
        enrollment_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM progress WHERE enrollment_id = $1 FOR UPDATE");
        sqlx::query_as::<_, Progress>(&query)
            .bind(enrollment_id)
            .fetch_optional(conn)
            .await
    }

    /// Persist updated fields and stamp `last_accessed_at`.
    pub async fn save_fields(
        conn: &mut PgConnection,
        id: DbId,
        fields: &ProgressFields,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "UPDATE progress SET \
                progress = $2, \
                completed = $3, \
                time_spent = $4, \
                player_state = $5, \
                last_accessed_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(id)
            .bind(fields.progress)
            .bind(fields.completed)
            .bind(fields.time_spent)
            .bind(Json(&fields.player_state))
            .fetch_one(conn)
            .await
    }
}
