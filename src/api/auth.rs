//! Credential, login and reset handlers, plus the session-validation
//! middleware protecting the authenticated routes.

use axum::{
    Extension, Json,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, ChangePasswordRequest, GeneratePasswordRequest, GeneratedPasswordDto,
    LoginDto, LoginRequest, LoginStatusDto, ResetPasswordRequest, ResetRequestBody,
    ResetRequestDto,
};
use crate::api::AppState;
use crate::services::credential_service::{CredentialStatus, PasswordChanged};
use crate::services::session_service::{AuthIdentity, LogoutReceipt};
use crate::services::{ClientContext, SessionError};

/// Bearer token the middleware validated, kept for handlers that need to
/// reach the session row again.
#[derive(Clone)]
pub struct SessionToken(pub String);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

/// Caller context for the activity log. Proxied deployments put the client
/// address in X-Forwarded-For; everything else falls back to loopback.
pub fn client_context(headers: &HeaderMap) -> ClientContext {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map_or_else(|| "127.0.0.1".to_string(), |ip| ip.trim().to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("Unknown")
        .to_string();

    ClientContext {
        ip_address,
        user_agent,
    }
}

/// Rejects requests whose token fails any of the session checks. On success
/// the decoded identity and the raw token ride along as extensions.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        return Err(SessionError::MissingToken.into());
    };

    let identity = state.session_service().validate(&token).await?;

    req.extensions_mut().insert(identity);
    req.extensions_mut().insert(SessionToken(token));

    Ok(next.run(req).await)
}

pub async fn generate_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GeneratePasswordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GeneratedPasswordDto>>), ApiError> {
    let student_id = body
        .student_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Student ID is required"))?;

    let generated = state.credential_service().generate(&student_id).await?;

    let dto = GeneratedPasswordDto {
        student_id: generated.student_id,
        student_name: generated.student_name,
        generated_password: generated.password,
        note: "Please save this password securely. It will not be shown again.".to_string(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Password generated successfully",
            dto,
        )),
    ))
}

pub async fn password_status(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<ApiResponse<CredentialStatus>>, ApiError> {
    let status = state.credential_service().status(&student_id).await?;
    Ok(Json(ApiResponse::success(status)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginDto>>, ApiError> {
    let (Some(student_id), Some(password)) = (
        body.student_id.filter(|s| !s.is_empty()),
        body.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation("Student ID and password are required"));
    };

    let ctx = client_context(&headers);
    let session = state
        .session_service()
        .login(&student_id, &password, &ctx)
        .await?;

    let dto = LoginDto {
        student_id: session.student_id,
        name: session.name,
        token: session.token,
        session_id: session.session_id,
        expires_at: session.expires_at,
    };

    Ok(Json(ApiResponse::with_message("Login successful", dto)))
}

pub async fn login_status(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<ApiResponse<LoginStatusDto>>, ApiError> {
    let status = state.session_service().status(&token.0).await?;

    let dto = LoginStatusDto {
        student_id: status.student_id,
        name: status.name,
        session_id: status.session_id,
        authenticated: true,
        session_created: status.created_at,
        session_expires: status.expires_at,
    };

    Ok(Json(ApiResponse::with_message("User is authenticated", dto)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<LogoutReceipt>>, ApiError> {
    let Some(token) = bearer_token(&headers) else {
        return Err(SessionError::MissingToken.into());
    };

    let receipt = state.session_service().logout(&token).await?;

    Ok(Json(ApiResponse::with_message(
        "Logged out successfully",
        receipt,
    )))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<PasswordChanged>>, ApiError> {
    let (Some(current), Some(new)) = (
        body.current_password.filter(|s| !s.is_empty()),
        body.new_password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Current password and new password are required",
        ));
    };

    let changed = state
        .credential_service()
        .change_password(&identity.student_id, &current, &new)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Password changed successfully",
        changed,
    )))
}

pub async fn reset_request(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetRequestBody>,
) -> Result<Json<ApiResponse<ResetRequestDto>>, ApiError> {
    let (Some(student_id), Some(email)) = (
        body.student_id.filter(|s| !s.is_empty()),
        body.email.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation("Student ID and email are required"));
    };

    let issued = state.reset_service().request_reset(&student_id, &email).await?;

    let dto = ResetRequestDto {
        student_id: issued.student_id,
        reset_token: issued.reset_token,
        expires_at: issued.expires_at,
        note: "In production, this token would be sent via email".to_string(),
    };

    Ok(Json(ApiResponse::with_message(
        "Password reset request initiated",
        dto,
    )))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<PasswordChanged>>, ApiError> {
    let (Some(token), Some(new_password)) = (
        body.reset_token.filter(|s| !s.is_empty()),
        body.new_password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Reset token and new password are required",
        ));
    };

    let changed = state
        .reset_service()
        .consume_reset(&token, &new_password)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Password reset successfully",
        changed,
    )))
}
