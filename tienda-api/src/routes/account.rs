/// Self-service account management
///
/// The authenticated user can view and edit their own profile, change their
/// password, and delete their account. There is no admin surface over other
/// users' accounts.
///
/// # Endpoints
///
/// - `GET /v1/account` - Own profile
/// - `PUT /v1/account` - Edit username, email, avatar
/// - `DELETE /v1/account` - Delete the account (sessions cascade)
/// - `POST /v1/account/password` - Change password

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tienda_shared::{
    auth::{
        context::AuthContext,
        password::{self, PasswordRule},
    },
    models::{
        session::Session,
        user::{UpdateUser, User},
    },
    notify::Notice,
};
use validator::Validate;

use super::auth::UserSummary;

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The account
    pub user: UserSummary,

    /// Status messages
    pub messages: Vec<Notice>,
}

/// Profile update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New username
    #[validate(length(min = 1, max = 30, message = "Username must be 1-30 characters"))]
    pub username: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New avatar URL; send null to clear
    #[serde(default, with = "double_option")]
    pub avatar_url: Option<Option<String>>,
}

/// Distinguishes an absent field from an explicit null
///
/// `{"avatar_url": null}` clears the avatar; omitting the key leaves it
/// unchanged.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password
    pub old_password: String,

    /// New password (at least 6 characters)
    pub new_password1: String,

    /// New password confirmation
    pub new_password2: String,
}

/// Generic status-only response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Status messages
    pub messages: Vec<Notice>,
}

/// Returns the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account no longer exists".to_string()))?;

    Ok(Json(ProfileResponse {
        user: UserSummary::from(&user),
        messages: vec![],
    }))
}

/// Edits the authenticated user's profile
///
/// # Errors
///
/// - `422`: validation failed
/// - `409`: new username or email already taken
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate().map_err(|e| validation_details(&e))?;

    let update = UpdateUser {
        username: req.username,
        email: req.email,
        avatar_url: req.avatar_url,
    };

    let user = User::update(&state.db, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account no longer exists".to_string()))?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(ProfileResponse {
        user: UserSummary::from(&user),
        messages: vec![Notice::success("Profile updated")],
    }))
}

/// Deletes the authenticated user's account
///
/// All of the user's sessions are removed by the foreign key cascade, so
/// the current token stops working immediately.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<StatusResponse>> {
    let deleted = User::delete(&state.db, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Account no longer exists".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, "Account deleted");

    Ok(Json(StatusResponse {
        messages: vec![Notice::info("Your account has been deleted")],
    }))
}

/// Changes the authenticated user's password
///
/// The current password must verify; the new pair follows the registration
/// rules. All other sessions are revoked so stolen tokens die with the old
/// password.
///
/// # Errors
///
/// - `401`: current password wrong
/// - `422`: new password pair invalid
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account no longer exists".to_string()))?;

    let valid = password::verify_password(&req.old_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    password::validate_new_password(&req.new_password1, &req.new_password2).map_err(|rule| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: match rule {
                PasswordRule::Mismatch => "new_password2".to_string(),
                PasswordRule::TooShort => "new_password1".to_string(),
            },
            message: rule.message().to_string(),
        }])
    })?;

    let password_hash = password::hash_password(&req.new_password1)?;
    User::update_password(&state.db, user.id, &password_hash).await?;

    let revoked =
        Session::delete_for_user_except(&state.db, user.id, auth.session_id).await?;

    tracing::info!(user_id = %user.id, revoked_sessions = revoked, "Password changed");

    let mut messages = vec![Notice::success("Password changed")];
    if revoked > 0 {
        messages.push(Notice::info(format!(
            "{} other session(s) were logged out",
            revoked
        )));
    }

    Ok(Json(StatusResponse { messages }))
}
