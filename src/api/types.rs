use serde::{Deserialize, Serialize};

/// Uniform response envelope. Success responses carry `message`/`data`;
/// failures carry `error`. Absent fields are omitted from the JSON.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeneratePasswordRequest {
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub student_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequestBody {
    pub student_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_token: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogActivityRequest {
    pub student_id: Option<String>,
    pub status: Option<String>,
    pub ip_address: Option<String>,
    pub device_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityPageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedPasswordDto {
    pub student_id: String,
    pub student_name: String,
    pub generated_password: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct LoginDto {
    pub student_id: String,
    pub name: String,
    pub token: String,
    pub session_id: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct LoginStatusDto {
    pub student_id: String,
    pub name: String,
    pub session_id: String,
    pub authenticated: bool,
    pub session_created: String,
    pub session_expires: String,
}

#[derive(Debug, Serialize)]
pub struct ResetRequestDto {
    pub student_id: String,
    pub reset_token: String,
    pub expires_at: String,
    pub note: String,
}
