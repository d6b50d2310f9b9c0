//! Login activity endpoints: manual append plus the two listings.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ActivityPageQuery, ApiError, ApiResponse, LogActivityRequest};
use crate::api::AppState;
use crate::api::auth::client_context;
use crate::entities::login_activity;

const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Debug, Serialize)]
pub struct StudentActivityDto {
    pub student_id: String,
    pub total_records: usize,
    pub activity: Vec<login_activity::Model>,
}

#[derive(Debug, Serialize)]
pub struct ActivityListDto {
    pub total_records: u64,
    pub page: u64,
    pub page_size: u64,
    pub activity: Vec<login_activity::Model>,
}

pub async fn log_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LogActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<login_activity::Model>>), ApiError> {
    let (Some(student_id), Some(status)) = (
        body.student_id.filter(|s| !s.is_empty()),
        body.status.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation("Student ID and status are required"));
    };

    // Explicit body fields win over what the transport saw
    let mut ctx = client_context(&headers);
    if let Some(ip) = body.ip_address.filter(|s| !s.is_empty()) {
        ctx.ip_address = ip;
    }
    if let Some(device) = body.device_type.filter(|s| !s.is_empty()) {
        ctx.user_agent = device;
    }

    let entry = state
        .activity()
        .record_manual(&student_id, &status, &ctx)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Login activity logged successfully",
            entry,
        )),
    ))
}

pub async fn student_activity(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<ApiResponse<StudentActivityDto>>, ApiError> {
    let records = state.activity().for_student(&student_id).await?;

    let dto = StudentActivityDto {
        total_records: records.len(),
        activity: records,
        student_id: student_id.clone(),
    };

    Ok(Json(ApiResponse::with_message(
        format!("Login activity for student {student_id}"),
        dto,
    )))
}

pub async fn all_activity(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityPageQuery>,
) -> Result<Json<ApiResponse<ActivityListDto>>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 500);

    let listing = state.activity().page(page, page_size).await?;

    let dto = ActivityListDto {
        total_records: listing.total_records,
        page: listing.page,
        page_size: listing.page_size,
        activity: listing.records,
    };

    Ok(Json(ApiResponse::with_message(
        "All login activity records",
        dto,
    )))
}
