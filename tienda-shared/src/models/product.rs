/// Product model and database operations
///
/// Catalog entries created through the administration views. Products have
/// no update or delete surface; inactive products stay in the table flagged
/// as not visible. Prices are `NUMERIC(10, 2)`, mapped to
/// [`rust_decimal::Decimal`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(200) NOT NULL,
///     price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
///     description TEXT,
///     stock INT NOT NULL DEFAULT 0 CHECK (stock >= 0),
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreResult;

/// A product catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID
    pub id: Uuid,

    /// Product name, at most 200 characters
    pub name: String,

    /// Price in USD, non-negative, two decimal places
    pub price: Decimal,

    /// Optional free-text description
    pub description: Option<String>,

    /// Units in stock, non-negative
    pub stock: i32,

    /// Whether the product is visible in the catalog
    pub active: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// Product name
    pub name: String,

    /// Price (non-negative)
    pub price: Decimal,

    /// Optional description
    pub description: Option<String>,

    /// Initial stock (non-negative)
    pub stock: i32,

    /// Visibility flag
    pub active: bool,
}

const PRODUCT_COLUMNS: &str = "id, name, price, description, stock, active, created_at";

impl Product {
    /// Creates a new product
    pub async fn create(pool: &PgPool, data: CreateProduct) -> StoreResult<Self> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, stock, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, description, stock, active, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.price)
        .bind(data.description)
        .bind(data.stock)
        .bind(data.active)
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Finds a product by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<Self>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Case-insensitive substring search over name and description
    ///
    /// Results are ordered ascending by name. The query is matched
    /// literally; ILIKE metacharacters are escaped.
    pub async fn search(pool: &PgPool, query: &str) -> StoreResult<Vec<Self>> {
        let pattern = super::escape_like(query);

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%'
            ORDER BY name ASC
            "#
        ))
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }
}
