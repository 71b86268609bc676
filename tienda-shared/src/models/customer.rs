/// Customer model and database operations
///
/// Customers are the records managed through the administration views:
/// created, listed, edited, and deleted. The email address is globally
/// unique; age is constrained to [1, 120] both at validation time and by a
/// check constraint.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     age INT NOT NULL CHECK (age >= 1 AND age <= 120),
///     email CITEXT NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Age above which a customer counts as VIP
///
/// VIP status is surfaced only as a notification message, never stored.
pub const VIP_AGE_THRESHOLD: i32 = 40;

/// A customer record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID
    pub id: Uuid,

    /// Full name, at most 100 characters
    pub name: String,

    /// Age in years, within [1, 120]
    pub age: i32,

    /// Email address, unique and case-insensitive via CITEXT
    pub email: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Whether this customer qualifies as VIP (age over the threshold)
    pub fn is_vip(&self) -> bool {
        self.age > VIP_AGE_THRESHOLD
    }
}

/// Input for creating a customer
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    /// Full name
    pub name: String,

    /// Age in years
    pub age: i32,

    /// Email address (unique)
    pub email: String,
}

/// Input for updating a customer; only non-None fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    /// New name
    pub name: Option<String>,

    /// New age
    pub age: Option<i32>,

    /// New email address
    pub email: Option<String>,
}

const CUSTOMER_COLUMNS: &str = "id, name, age, email, created_at, updated_at";

impl Customer {
    /// Creates a new customer
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateField` when the email is already taken.
    pub async fn create(pool: &PgPool, data: CreateCustomer) -> StoreResult<Self> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, age, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, age, email, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.age)
        .bind(data.email)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<Self>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers, ordered ascending by name
    pub async fn list(pool: &PgPool) -> StoreResult<Vec<Self>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Updates a customer
    ///
    /// Only non-None fields are written; `updated_at` is always refreshed.
    /// Returns None when the customer no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCustomer,
    ) -> StoreResult<Option<Self>> {
        let mut query = String::from("UPDATE customers SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.age.is_some() {
            bind_count += 1;
            query.push_str(&format!(", age = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Customer>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(age) = data.age {
            q = q.bind(age);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }

        let customer = q.fetch_optional(pool).await?;

        Ok(customer)
    }

    /// Deletes a customer by ID
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring search over name and email
    ///
    /// Results are ordered ascending by name. The query is matched
    /// literally; ILIKE metacharacters are escaped.
    pub async fn search(pool: &PgPool, query: &str) -> StoreResult<Vec<Self>> {
        let pattern = super::escape_like(query);

        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%'
            ORDER BY name ASC
            "#
        ))
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }
}
