use lms_core::shopify::ProductPayload;
use lms_db::models::course::{Course, SyncCourse};
use lms_db::repositories::CourseRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// Create or overwrite the course for a storefront product.
///
/// Title, description, thumbnail, handle, and snapshot are replaced whole.
pub async fn upsert_course(
    pool: &PgPool,
    product: &ProductPayload,
    snapshot: Option<serde_json::Value>,
) -> AppResult<Course> {
    let input = SyncCourse {
        shopify_product_id: product.id.clone(),
        title: product.title.trim().to_string(),
        description: product.body_html.clone(),
        thumbnail: product.thumbnail().map(str::to_string),
        handle: product.handle().map(str::to_string),
        shopify_data: snapshot,
    };

    let course = CourseRepo::upsert_from_product(pool, &input).await?;
    tracing::info!(course_id = course.id, product_id = %course.shopify_product_id, "Course synced");
    Ok(course)
}
