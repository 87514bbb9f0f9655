//! Wishlist and cart repository for database operations
//!
//! Entries are rows keyed by `(user_id, product_id)`, so every mutation is a
//! single statement and concurrent writers to the same cart cannot lose
//! updates.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{CartRepository, product::product_from_row};
use crate::models::{CartItem, CartLine, Product, WishlistToggle};

/// PostgreSQL-backed wishlist and cart store
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn wishlist(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT product_id FROM wishlist_items WHERE user_id = $1 ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn wishlist_products(&self, user_id: Uuid) -> DatabaseResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category, p.sizes,
                   p.image_url, p.created_by, p.created_at, p.updated_at
            FROM wishlist_items w
            JOIN products p ON p.id = w.product_id
            WHERE w.user_id = $1
            ORDER BY w.position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<_, _>>()
            .map_err(DatabaseError::Query)
    }

    async fn toggle_wishlist(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> DatabaseResult<WishlistToggle> {
        // Both branches see the same snapshot: the insert only runs when the
        // delete matched nothing.
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            WITH removed AS (
                DELETE FROM wishlist_items
                WHERE user_id = $1 AND product_id = $2
                RETURNING product_id
            )
            INSERT INTO wishlist_items (user_id, product_id)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM removed)
            ON CONFLICT (user_id, product_id) DO NOTHING
            RETURNING product_id
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(match inserted {
            Some(_) => WishlistToggle::Added,
            None => WishlistToggle::Removed,
        })
    }

    async fn cart(&self, user_id: Uuid) -> DatabaseResult<Vec<CartItem>> {
        let rows = sqlx::query(
            "SELECT product_id, quantity FROM cart_items WHERE user_id = $1 ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter()
            .map(|row| {
                Ok(CartItem {
                    product: row.try_get("product_id")?,
                    quantity: row.try_get("quantity")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(DatabaseError::Query)
    }

    async fn cart_lines(&self, user_id: Uuid) -> DatabaseResult<Vec<CartLine>> {
        let rows = sqlx::query(
            r#"
            SELECT c.product_id, c.quantity, p.name, p.image_url, p.price
            FROM cart_items c
            LEFT JOIN products p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter()
            .map(|row| {
                Ok(CartLine {
                    id: row.try_get("product_id")?,
                    name: row.try_get("name")?,
                    image: row.try_get("image_url")?,
                    price: row.try_get::<Option<f64>, _>("price")?.unwrap_or(0.0),
                    quantity: row.try_get("quantity")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(DatabaseError::Query)
    }

    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + 1
            WHERE cart_items.quantity < 2147483647
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_cart_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_cart(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected())
    }

    async fn clear_cart(&self, user_id: Uuid) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(())
    }
}
