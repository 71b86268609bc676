/// Session model and database operations
///
/// A session row is the server-side state behind an authenticated request.
/// Login and registration create one; logout deletes it, which fully
/// invalidates the token. Only the SHA-256 hash of the token is stored.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// A server-side login session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hex digest of the bearer token
    pub token_hash: String,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

/// An active session joined with its user's identity
///
/// Returned by [`Session::find_active`] so the middleware resolves the
/// token to a user in a single query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveSession {
    /// Session ID
    pub id: Uuid,

    /// Owning user ID
    pub user_id: Uuid,

    /// Owning user's username
    pub username: String,

    /// Session expiry
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for a user
    ///
    /// `token_hash` is the SHA-256 digest of the plaintext token handed to
    /// the client; `ttl_hours` controls the expiry.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        ttl_hours: i64,
    ) -> StoreResult<Self> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, NOW() + make_interval(hours => $3))
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(ttl_hours as i32)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Resolves a token hash to an active (unexpired) session and its user
    ///
    /// Returns None when no session matches or the matching session has
    /// expired. Expired rows are left in place for [`Session::delete_expired`].
    pub async fn find_active(pool: &PgPool, token_hash: &str) -> StoreResult<Option<ActiveSession>> {
        let session = sqlx::query_as::<_, ActiveSession>(
            r#"
            SELECT s.id, s.user_id, u.username, s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session (logout)
    ///
    /// Returns true if a session was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all of a user's sessions except one
    ///
    /// Used after a password change so other logins are revoked while the
    /// current session stays alive. Returns the number of revoked sessions.
    pub async fn delete_for_user_except(
        pool: &PgPool,
        user_id: Uuid,
        keep: Uuid,
    ) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND id <> $2")
            .bind(user_id)
            .bind(keep)
            .execute(pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected())
    }

    /// Removes expired sessions
    ///
    /// Expiry alone already rejects stale tokens; this reclaims the rows.
    /// Returns the number of rows removed.
    pub async fn delete_expired(pool: &PgPool) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected())
    }
}
