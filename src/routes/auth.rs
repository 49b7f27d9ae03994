use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::json;

use crate::app::AppState;
use crate::audit::{self, AuditAction};
use crate::auth::{bearer_token, AuthSession};
use crate::config::ResetCodePolicy;
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::models::user::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    MessageResponse, ResetPasswordRequest, SessionUser, User, VerifyResponse,
};
use crate::store::RecordStore;
use crate::utils::{hash_password, validate_password, verify_password};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }

    let user = find_user_by_email(&state.store, &payload.email)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let session_user = SessionUser::from(&user);
    let token = state.sessions.issue(session_user.clone()).await;

    audit::record(AuditAction::UserLogin, user.id, None, json!({ "email": user.email }));

    let message = if user.needs_password_reset {
        "Login successful. Please change your password."
    } else {
        "Login successful"
    };

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: session_user,
        message: message.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Session is valid", body = VerifyResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn verify(session: AuthSession) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        user: session.user,
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageResponse> {
    if let Some(token) = bearer_token(&headers) {
        if let Some(user) = state.sessions.resolve(token).await {
            audit::record(AuditAction::UserLogout, user.id, None, json!({}));
        }
        state.sessions.revoke(token).await;
    }

    Json(MessageResponse::ok("Logged out successfully"))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    security(("bearerAuth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, new session issued", body = AuthResponse),
        (status = 400, description = "Missing fields, short password or wrong current password"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: AuthSession,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> AppResult<Json<AuthResponse>> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(AppError::bad_request("Current password and new password are required"));
    }
    validate_password(&payload.new_password)?;

    let mut user = state
        .store
        .users
        .get(session.user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(AppError::bad_request("Current password is incorrect"));
    }

    let first_time = user.needs_password_reset;
    user.password_hash = hash_password(&payload.new_password)?;
    user.needs_password_reset = false;
    state.store.users.put(user.clone()).await?;

    audit::record(
        AuditAction::PasswordChanged,
        user.id,
        None,
        json!({ "isFirstTimeChange": first_time }),
    );

    let session_user = SessionUser::from(&user);
    let token = state.sessions.issue(session_user.clone()).await;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: session_user,
        message: "Password updated successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code issued", body = ForgotPasswordResponse),
        (status = 400, description = "Email missing"),
        (status = 404, description = "No account for this email")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> AppResult<Json<ForgotPasswordResponse>> {
    if payload.email.trim().is_empty() {
        return Err(AppError::bad_request("Email is required"));
    }

    let user = find_user_by_email(&state.store, &payload.email)
        .await?
        .ok_or_else(|| AppError::not_found("No account found with this email address"))?;

    let code = state.reset_codes.issue(&user.email).await;
    audit::record(AuditAction::PasswordResetRequested, user.id, None, json!({ "email": user.email }));

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "Password reset instructions sent to your email".to_string(),
        temp_reset_code: code,
        note: "Demo: Use this code to reset your password".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Missing fields, short password or rejected reset code"),
        (status = 404, description = "No account for this email")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    if payload.email.trim().is_empty() || payload.new_password.is_empty() {
        return Err(AppError::bad_request("Email and new password are required"));
    }
    validate_password(&payload.new_password)?;

    let mut user = find_user_by_email(&state.store, &payload.email)
        .await?
        .ok_or_else(|| AppError::not_found("No account found with this email address"))?;

    if state.config.reset_code_policy == ResetCodePolicy::Verify {
        let code = payload.reset_code.as_deref().unwrap_or_default();
        if !state.reset_codes.consume(&user.email, code).await {
            return Err(AppError::bad_request("Invalid or expired reset code"));
        }
    }

    user.password_hash = hash_password(&payload.new_password)?;
    state.store.users.put(user.clone()).await?;

    audit::record(AuditAction::PasswordReset, user.id, None, json!({ "email": user.email }));

    Ok(Json(MessageResponse::ok(
        "Password reset successfully. Please login with your new password.",
    )))
}

pub(crate) async fn find_user_by_email(store: &RecordStore, email: &str) -> AppResult<Option<User>> {
    let users = store.users.list().await?;
    Ok(users.into_iter().find(|user| user.email_matches(email)))
}
