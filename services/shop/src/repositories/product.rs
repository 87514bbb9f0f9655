//! Product repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::ProductRepository;
use crate::models::{Category, NewProduct, Product, ProductFields};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, sizes, image_url, \
                               created_by, created_at, updated_at";

/// PostgreSQL-backed product store
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    let category: String = row.try_get("category")?;
    let category = category
        .parse::<Category>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category,
        sizes: row.try_get("sizes")?,
        image_url: row.try_get("image_url")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, new_product: &NewProduct) -> DatabaseResult<Product> {
        let fields = &new_product.fields;
        info!("Creating product: {}", fields.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (id, name, description, price, category, sizes, image_url, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.category.as_str())
        .bind(&fields.sizes)
        .bind(&new_product.image_url)
        .bind(new_product.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        product_from_row(&row).map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(DatabaseError::Query)
    }

    async fn list(&self) -> DatabaseResult<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<_, _>>()
            .map_err(DatabaseError::Query)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: &ProductFields,
        image_url: &str,
    ) -> DatabaseResult<Option<Product>> {
        info!("Updating product: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5, sizes = $6,
                image_url = $7, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.category.as_str())
        .bind(&fields.sizes)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(DatabaseError::Query)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
