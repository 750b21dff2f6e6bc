//! Repository for the `customers` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::customer::{Customer, CustomerProfile};

/// Column list for `customers` queries.
const CUSTOMER_COLUMNS: &str = "id, display_name, avatar_url, created_at, updated_at";

pub struct CustomerRepo;

impl CustomerRepo {
    /// Create a customer record.
    pub async fn create(
        pool: &PgPool,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<Customer, sqlx::Error> {
        let sql = format!(
            "INSERT INTO customers (display_name, avatar_url) \
             VALUES ($1, $2) \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&sql)
            .bind(display_name)
            .bind(avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Fetch the limited public profile attached to task detail responses.
    ///
    /// A missing customer degrades to `None` instead of failing the whole
    /// detail fetch.
    pub async fn find_public_profile(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CustomerProfile>, sqlx::Error> {
        sqlx::query_as::<_, CustomerProfile>(
            "SELECT id, display_name, avatar_url, created_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
