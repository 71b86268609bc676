/// Store error taxonomy
///
/// All record store operations return `Result<_, StoreError>` instead of a
/// raw `sqlx::Error`. The taxonomy distinguishes the failure modes callers
/// actually react to differently:
///
/// - `DuplicateField`: a uniqueness constraint (email, username) was violated
///   at the storage layer. Surfaced to clients as a conflict naming the field.
/// - `ConstraintViolation`: some other named constraint rejected the write
///   (check constraints on age, price, stock).
/// - `StorageUnavailable`: connectivity or protocol failure; nothing about
///   the request itself was wrong.
///
/// Validation runs before any write, so a `DuplicateField` at this layer
/// means a concurrent submission slipped between the uniqueness pre-check
/// and the insert. The constraint remains the backstop for that race.
///
/// # Example
///
/// ```no_run
/// use tienda_shared::error::StoreError;
/// use tienda_shared::models::customer::{Customer, CreateCustomer};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, data: CreateCustomer) {
/// match Customer::create(&pool, data).await {
///     Ok(customer) => println!("created {}", customer.id),
///     Err(StoreError::DuplicateField { field }) => println!("{} taken", field),
///     Err(e) => println!("store failure: {}", e),
/// }
/// # }
/// ```

/// Typed failure from the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (email or username collision)
    #[error("duplicate value for unique field '{field}'")]
    DuplicateField {
        /// Name of the colliding field
        field: String,
    },

    /// A non-uniqueness constraint rejected the write
    #[error("constraint violation: {constraint}")]
    ConstraintViolation {
        /// Name of the violated constraint
        constraint: String,
    },

    /// The storage layer itself failed (connectivity, protocol, timeout)
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),
}

/// Classifies sqlx errors into the store taxonomy
///
/// Unique-index violations on email/username columns become `DuplicateField`;
/// other named constraints become `ConstraintViolation`; everything else is
/// `StorageUnavailable`.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if db_err.is_unique_violation() {
                        let field = if constraint.contains("email") {
                            "email"
                        } else if constraint.contains("username") {
                            "username"
                        } else if constraint.contains("token") {
                            "token"
                        } else {
                            constraint
                        };
                        return StoreError::DuplicateField {
                            field: field.to_string(),
                        };
                    }
                    return StoreError::ConstraintViolation {
                        constraint: constraint.to_string(),
                    };
                }
                StoreError::StorageUnavailable(err)
            }
            _ => StoreError::StorageUnavailable(err),
        }
    }
}

/// Result alias for record store operations
pub type StoreResult<T> = Result<T, StoreError>;
