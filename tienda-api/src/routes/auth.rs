/// Authentication endpoints
///
/// Registration, login, and logout. Registration implicitly logs the new
/// user in: both register and login create a server-side session and return
/// the bearer token exactly once. Logout deletes the session row, which
/// fully invalidates the token.
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user (implicit login)
/// - `POST /v1/auth/login` - Login with email and password
/// - `POST /v1/auth/logout` - Invalidate the current session

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tienda_shared::{
    auth::{
        context::AuthContext,
        password::{self, PasswordRule},
        token::generate_session_token,
    },
    models::{
        session::Session,
        user::{CreateUser, User},
    },
    notify::Notice,
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique, at most 30 characters)
    #[validate(length(min = 1, max = 30, message = "Username must be 1-30 characters"))]
    pub username: String,

    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional avatar image URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    /// Password (at least 6 characters)
    pub password1: String,

    /// Password confirmation (must match)
    pub password2: String,
}

/// Public view of a user account (no password material)
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User ID
    pub id: String,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Avatar URL, if set
    pub avatar_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The account behind the new session
    pub user: UserSummary,

    /// Bearer session token; shown exactly once
    pub token: String,

    /// Status messages
    pub messages: Vec<Notice>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Status messages
    pub messages: Vec<Notice>,
}

/// Maps a failed password rule onto a validation detail
fn password_rule_error(rule: PasswordRule) -> ApiError {
    ApiError::ValidationError(vec![ValidationErrorDetail {
        field: match rule {
            PasswordRule::Mismatch => "password2".to_string(),
            PasswordRule::TooShort => "password1".to_string(),
        },
        message: rule.message().to_string(),
    }])
}

/// Register a new user
///
/// Validates the form, checks username and email uniqueness, hashes the
/// password, and creates the account plus a session. The uniqueness
/// pre-check is advisory: the storage constraint is the backstop when a
/// concurrent registration wins the race.
///
/// # Errors
///
/// - `422`: validation failed (including password rules)
/// - `409`: username or email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    req.validate().map_err(|e| validation_details(&e))?;

    password::validate_new_password(&req.password1, &req.password2)
        .map_err(password_rule_error)?;

    // Uniqueness pre-checks; no write happens before these pass
    if User::find_by_username(&state.db, &req.username).await?.is_some() {
        return Err(ApiError::DuplicateField("username".to_string()));
    }
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::DuplicateField("email".to_string()));
    }

    let password_hash = password::hash_password(&req.password1)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            avatar_url: req.avatar_url,
        },
    )
    .await?;

    let (token, token_hash) = generate_session_token();
    Session::create(&state.db, user.id, &token_hash, state.session_ttl_hours()).await?;

    tracing::info!(user_id = %user.id, "User registered");

    let messages = vec![
        Notice::success(format!("Account \"{}\" created", user.username)),
        Notice::info("You are now logged in"),
    ];

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: UserSummary::from(&user),
            token,
            messages,
        }),
    ))
}

/// Login endpoint
///
/// Verifies the email and password against the stored Argon2 hash. Failure
/// is a uniform 401 regardless of whether the email was unknown or the
/// password wrong.
///
/// # Errors
///
/// - `422`: validation failed
/// - `401`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate().map_err(|e| validation_details(&e))?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    let (token, token_hash) = generate_session_token();
    Session::create(&state.db, user.id, &token_hash, state.session_ttl_hours()).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let messages = vec![Notice::success(format!("Welcome back, {}!", user.username))];

    Ok(Json(SessionResponse {
        user: UserSummary::from(&user),
        token,
        messages,
    }))
}

/// Logout endpoint
///
/// Deletes the session backing the current request. The token presented in
/// the Authorization header is unusable afterwards.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<LogoutResponse>> {
    Session::delete(&state.db, auth.session_id).await?;

    tracing::info!(user_id = %auth.user_id, "User logged out");

    Ok(Json(LogoutResponse {
        messages: vec![Notice::info("You have been logged out")],
    }))
}
