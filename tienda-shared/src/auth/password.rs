/// Password hashing module using Argon2id
///
/// Passwords are hashed with Argon2id and stored in PHC string format.
/// Plaintext passwords never reach the database.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use tienda_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password")?;
/// assert!(verify_password("super_secret_password", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Minimum accepted password length at registration and password change
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Rejection reason from [`validate_new_password`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    /// The two password fields did not match
    Mismatch,

    /// The password is shorter than [`MIN_PASSWORD_LENGTH`]
    TooShort,
}

impl PasswordRule {
    /// Human-readable description of the failed rule
    pub fn message(self) -> &'static str {
        match self {
            PasswordRule::Mismatch => "Passwords do not match",
            PasswordRule::TooShort => "Password must be at least 6 characters long",
        }
    }
}

/// Hashes a password using Argon2id with secure parameters
///
/// Returns a PHC string hash embedding the algorithm, parameters, and salt:
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    // Generate a random salt using OS RNG
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
/// Comparison is constant time.
///
/// # Errors
///
/// Returns `PasswordError` if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

/// Validates a new password pair against the registration rules
///
/// Checks that both entries match and that the password meets the minimum
/// length. Applied at registration and at password change, before hashing.
///
/// # Example
///
/// ```
/// use tienda_shared::auth::password::{validate_new_password, PasswordRule};
///
/// assert!(validate_new_password("abc123", "abc123").is_ok());
/// assert_eq!(
///     validate_new_password("abc12", "abc12"),
///     Err(PasswordRule::TooShort)
/// );
/// assert_eq!(
///     validate_new_password("abc123", "abc124"),
///     Err(PasswordRule::Mismatch)
/// );
/// ```
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), PasswordRule> {
    if password != confirmation {
        return Err(PasswordRule::Mismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRule::TooShort);
    }

    Ok(())
}
