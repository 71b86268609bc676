/// Session token generation and hashing
///
/// Login produces an opaque bearer token with the format
/// `tnd_{48_random_alphanumeric_chars}`. The plaintext token is returned to
/// the client exactly once; the database stores only its SHA-256 hash, so a
/// leaked sessions table does not yield usable credentials.
///
/// # Example
///
/// ```
/// use tienda_shared::auth::token::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert!(token.starts_with("tnd_"));
/// assert_eq!(hash, hash_session_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix identifying a session token
pub const TOKEN_PREFIX: &str = "tnd_";

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 48;

/// Generates a new session token
///
/// Returns a tuple of (plaintext_token, sha256_hash). Store the hash,
/// hand the plaintext to the client.
pub fn generate_session_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_session_token(&token);
    (token, hash)
}

/// Hashes a session token for storage or lookup
///
/// Returns the lowercase hex SHA-256 digest of the token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a random alphanumeric string of the given length
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
