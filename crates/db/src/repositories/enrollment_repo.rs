//! Repository for the `enrollments` table.

use lms_core::enrollment::{
    CANCELLABLE_STATUSES, STATUS_ACTIVE, STATUS_CANCELLED, STATUS_COMPLETED,
};
use lms_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::enrollment::{Enrollment, NewEnrollment};
use crate::models::progress::Progress;
use crate::repositories::ProgressRepo;

const COLUMNS: &str = "id, user_id, course_id, shopify_order_id, shopify_order_number, \
                        shopify_product_id, status, enrolled_at, completed_at, expires_at, \
                        order_data, created_at, updated_at";

/// Provides lookup, creation, and status transitions for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's enrollments, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 \
             ORDER BY enrolled_at DESC, id DESC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every enrollment created from one order.
    pub async fn list_for_order(
        pool: &PgPool,
        shopify_order_id: &str,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE shopify_order_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(shopify_order_id)
            .fetch_all(pool)
            .await
    }

    /// Create an `active` enrollment together with its zeroed progress record.
    ///
    /// Both rows are written in one transaction. Returns `None` without
    /// writing anything when the (user, order, product) triple already
    /// exists, including when a concurrent delivery inserted it first.
    pub async fn create_with_progress(
        pool: &PgPool,
        input: &NewEnrollment,
    ) -> Result<Option<(Enrollment, Progress)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO enrollments \
                (user_id, course_id, shopify_order_id, shopify_order_number, \
                 shopify_product_id, status, order_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_enrollments_user_order_product DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&query)
            .bind(input.user_id)
            .bind(input.course_id)
            .bind(&input.shopify_order_id)
            .bind(&input.shopify_order_number)
            .bind(&input.shopify_product_id)
            .bind(STATUS_ACTIVE)
            .bind(&input.order_data)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(enrollment) = enrollment else {
            tracing::debug!(
                user_id = input.user_id,
                order_id = %input.shopify_order_id,
                product_id = %input.shopify_product_id,
                "Enrollment already exists, skipping",
            );
            tx.rollback().await?;
            return Ok(None);
        };

        let progress = ProgressRepo::insert_initial(&mut *tx, &enrollment)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(Some((enrollment, progress)))
    }

    /// Move an `active` enrollment to `completed` and stamp `completed_at`.
    ///
    /// Returns `None` when the enrollment is not currently `active`.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET status = $2, completed_at = NOW() \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(STATUS_COMPLETED)
            .bind(STATUS_ACTIVE)
            .fetch_optional(conn)
            .await
    }

    /// Cancel every `active` or `completed` enrollment from an order.
    ///
    /// Returns the number of enrollments cancelled.
    pub async fn cancel_for_order(pool: &PgPool, shopify_order_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE enrollments SET status = $2 \
             WHERE shopify_order_id = $1 AND status = ANY($3)",
        )
        .bind(shopify_order_id)
        .bind(STATUS_CANCELLED)
        .bind(CANCELLABLE_STATUSES)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
