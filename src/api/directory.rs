//! Read-only proxy over the student directory.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::clients::directory::Student;

pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Student>>>, ApiError> {
    let students = state.directory().list_all().await?;
    Ok(Json(ApiResponse::with_message(
        "Student list retrieved from Enrollment Microservice",
        students,
    )))
}

pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<ApiResponse<Student>>, ApiError> {
    let student = state
        .directory()
        .lookup(&student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found in Enrollment system".to_string()))?;

    Ok(Json(ApiResponse::with_message("Student found", student)))
}
