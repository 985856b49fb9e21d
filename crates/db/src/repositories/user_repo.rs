//! Repository for the `users` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CustomerFields, NewUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shopify_customer_id, email, first_name, last_name, name, phone, \
                        shopify_data, last_synced_at, created_at, updated_at";

/// Provides lookup and sync operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by normalized storefront customer id.
    pub async fn find_by_customer_id(
        pool: &PgPool,
        shopify_customer_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE shopify_customer_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(shopify_customer_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user for `input.shopify_customer_id`, inserting it if absent.
    ///
    /// An existing row is returned untouched. Concurrent callers racing on the
    /// same customer id both end up with the single row that won the insert.
    /// The boolean is `true` when this call created the row.
    pub async fn find_or_create(pool: &PgPool, input: &NewUser) -> Result<(User, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                (shopify_customer_id, email, name, first_name, last_name, phone, shopify_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_users_shopify_customer_id DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, User>(&query)
            .bind(&input.shopify_customer_id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.shopify_data)
            .fetch_optional(pool)
            .await?;

        if let Some(user) = inserted {
            return Ok((user, true));
        }

        let existing = Self::find_by_customer_id(pool, &input.shopify_customer_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((existing, false))
    }

    /// Insert or update a user from a storefront customer payload.
    ///
    /// On insert, `fallback` supplies the email and name when `fields` lacks
    /// them. On update, absent fields keep their stored values, while the
    /// snapshot is replaced and `last_synced_at` is stamped.
    pub async fn upsert_customer(
        pool: &PgPool,
        shopify_customer_id: &str,
        fields: &CustomerFields,
        fallback_email: &str,
        fallback_name: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                (shopify_customer_id, email, name, first_name, last_name, phone, shopify_data) \
             VALUES ($1, COALESCE($2, $8), COALESCE($3, $9), $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_users_shopify_customer_id DO UPDATE SET \
                email = COALESCE($2, users.email), \
                name = COALESCE($3, users.name), \
                first_name = COALESCE($4, users.first_name), \
                last_name = COALESCE($5, users.last_name), \
                phone = COALESCE($6, users.phone), \
                shopify_data = $7, \
                last_synced_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(shopify_customer_id)
            .bind(&fields.email)
            .bind(&fields.name)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.phone)
            .bind(&fields.shopify_data)
            .bind(fallback_email)
            .bind(fallback_name)
            .fetch_one(pool)
            .await
    }

    /// Refresh an existing user's profile. Never inserts.
    ///
    /// Returns `None` if no user has the given customer id.
    pub async fn update_profile(
        pool: &PgPool,
        shopify_customer_id: &str,
        fields: &CustomerFields,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                email = COALESCE($2, email), \
                name = COALESCE($3, name), \
                first_name = COALESCE($4, first_name), \
                last_name = COALESCE($5, last_name), \
                phone = COALESCE($6, phone), \
                shopify_data = COALESCE($7, shopify_data), \
                last_synced_at = NOW() \
             WHERE shopify_customer_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(shopify_customer_id)
            .bind(&fields.email)
            .bind(&fields.name)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.phone)
            .bind(&fields.shopify_data)
            .fetch_optional(pool)
            .await
    }
}
