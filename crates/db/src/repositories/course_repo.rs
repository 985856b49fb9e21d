//! Repository for the `courses` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CourseSummary, SyncCourse, UpsertCourseDetails};

const COLUMNS: &str = "id, shopify_product_id, title, description, thumbnail, handle, \
                        scorm_url, admission_id, metadata, is_active, total_lessons, \
                        estimated_duration_mins, shopify_data, last_synced_at, \
                        created_at, updated_at";

/// Provides lookup and sync operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a course by storefront product id, active or not.
    pub async fn find_by_product_id(
        pool: &PgPool,
        shopify_product_id: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE shopify_product_id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(shopify_product_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active course by storefront product id.
    pub async fn find_active_by_product_id(
        pool: &PgPool,
        shopify_product_id: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses WHERE shopify_product_id = $1 AND is_active = true"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(shopify_product_id)
            .fetch_optional(pool)
            .await
    }

    /// List active courses, newest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses WHERE is_active = true ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Course>(&query).fetch_all(pool).await
    }

    /// Load compact views of the given courses, in no particular order.
    pub async fn list_summaries(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<CourseSummary>, sqlx::Error> {
        sqlx::query_as::<_, CourseSummary>(
            "SELECT id, title, thumbnail, scorm_url, admission_id FROM courses WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Create or fully overwrite a course from a storefront product.
    ///
    /// Title, description, thumbnail, handle, and snapshot are replaced as a
    /// whole; the storefront is the only source of truth for them.
    pub async fn upsert_from_product(
        pool: &PgPool,
        input: &SyncCourse,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses \
                (shopify_product_id, title, description, thumbnail, handle, shopify_data) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT uq_courses_shopify_product_id DO UPDATE SET \
                title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                thumbnail = EXCLUDED.thumbnail, \
                handle = EXCLUDED.handle, \
                shopify_data = EXCLUDED.shopify_data, \
                last_synced_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.shopify_product_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail)
            .bind(&input.handle)
            .bind(&input.shopify_data)
            .fetch_one(pool)
            .await
    }

    /// Create or overwrite a course's player-facing details.
    pub async fn upsert_details(
        pool: &PgPool,
        input: &UpsertCourseDetails,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses \
                (shopify_product_id, title, description, thumbnail, scorm_url, admission_id, \
                 shopify_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_courses_shopify_product_id DO UPDATE SET \
                title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                thumbnail = EXCLUDED.thumbnail, \
                scorm_url = EXCLUDED.scorm_url, \
                admission_id = EXCLUDED.admission_id, \
                shopify_data = EXCLUDED.shopify_data, \
                last_synced_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.shopify_product_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail)
            .bind(&input.scorm_url)
            .bind(&input.admission_id)
            .bind(&input.shopify_data)
            .fetch_one(pool)
            .await
    }
}
