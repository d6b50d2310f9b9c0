use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{CredentialError, ResetError, SessionError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    Conflict(String),

    Unauthorized(String),

    Forbidden(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        let msg = err.to_string();
        match err {
            CredentialError::StudentNotFound | CredentialError::NotFound => {
                ApiError::NotFound(msg)
            }
            CredentialError::InactiveAccount | CredentialError::PolicyViolation(_) => {
                ApiError::ValidationError(msg)
            }
            CredentialError::AlreadyExists => ApiError::Conflict(msg),
            CredentialError::InvalidCredentials => ApiError::Unauthorized(msg),
            CredentialError::Database(_) => ApiError::DatabaseError(msg),
            CredentialError::Internal(_) => ApiError::InternalError(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let msg = err.to_string();
        match err {
            SessionError::InvalidCredentials
            | SessionError::InactiveAccount
            | SessionError::NoCredential
            | SessionError::MissingToken
            | SessionError::SessionNotFound
            | SessionError::SessionExpired => ApiError::Unauthorized(msg),
            // A bad signature is tampering, not a stale session
            SessionError::InvalidToken => ApiError::Forbidden(msg),
            SessionError::Database(_) => ApiError::DatabaseError(msg),
            SessionError::Internal(_) => ApiError::InternalError(msg),
        }
    }
}

impl From<ResetError> for ApiError {
    fn from(err: ResetError) -> Self {
        let msg = err.to_string();
        match err {
            ResetError::StudentNotFound | ResetError::CredentialMissing => ApiError::NotFound(msg),
            ResetError::InvalidToken | ResetError::Expired | ResetError::PolicyViolation(_) => {
                ApiError::ValidationError(msg)
            }
            ResetError::Database(_) => ApiError::DatabaseError(msg),
            ResetError::Internal(_) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
