use lms_core::enrollment::order_revokes_access;
use lms_core::error::CoreError;
use lms_core::shopify::OrderPayload;
use lms_db::models::enrollment::NewEnrollment;
use lms_db::repositories::{CourseRepo, EnrollmentRepo};
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::error::AppResult;
use crate::sync::customer::sync_customer;

/// What happened to the line items of one order delivery.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Enrollments created by this delivery.
    pub enrolled: usize,
    /// Line items with no product id or no matching course.
    pub skipped_not_course: usize,
    /// Line items already enrolled by an earlier delivery.
    pub skipped_duplicate: usize,
}

/// Enroll the order's customer in every purchased course.
///
/// Each line item is handled on its own: items without a matching course
/// are skipped, items already enrolled are skipped, and the rest get an
/// `active` enrollment with a zeroed progress record. A failure partway
/// leaves earlier items committed; redelivery completes the rest.
pub async fn process_order(
    pool: &PgPool,
    order: &OrderPayload,
    snapshot: &serde_json::Value,
    config: &ServerConfig,
) -> AppResult<OrderOutcome> {
    let customer = order
        .customer
        .as_ref()
        .ok_or_else(|| CoreError::BadRequest("No customer data in order".into()))?;

    let user = sync_customer(pool, customer, snapshot.get("customer").cloned(), config).await?;

    let mut outcome = OrderOutcome::default();
    for item in &order.line_items {
        let Some(product_id) = item.product_id.as_deref() else {
            tracing::info!(order_id = %order.id, title = ?item.title, "Line item has no product, skipping");
            outcome.skipped_not_course += 1;
            continue;
        };

        let Some(course) = CourseRepo::find_by_product_id(pool, product_id).await? else {
            tracing::info!(order_id = %order.id, product_id, "No course for product, skipping");
            outcome.skipped_not_course += 1;
            continue;
        };

        let input = NewEnrollment {
            user_id: user.id,
            course_id: course.id,
            shopify_order_id: order.id.clone(),
            shopify_order_number: order.order_number.clone(),
            shopify_product_id: product_id.to_string(),
            order_data: Some(snapshot.clone()),
        };

        match EnrollmentRepo::create_with_progress(pool, &input).await? {
            Some((enrollment, _progress)) => {
                tracing::info!(
                    enrollment_id = enrollment.id,
                    user_id = user.id,
                    course_id = course.id,
                    order_id = %order.id,
                    "Enrollment created",
                );
                outcome.enrolled += 1;
            }
            None => outcome.skipped_duplicate += 1,
        }
    }

    Ok(outcome)
}

/// Cancel the order's enrollments when it was refunded or cancelled.
///
/// Returns the number of enrollments cancelled. Cancellation is one-way;
/// a later un-refund does not reactivate anything.
pub async fn update_order_status(pool: &PgPool, order: &OrderPayload) -> AppResult<u64> {
    if !order_revokes_access(
        order.financial_status.as_deref(),
        order.cancelled_at.as_deref(),
    ) {
        return Ok(0);
    }

    let cancelled = EnrollmentRepo::cancel_for_order(pool, &order.id).await?;
    tracing::info!(order_id = %order.id, cancelled, "Enrollments cancelled for order");
    Ok(cancelled)
}
