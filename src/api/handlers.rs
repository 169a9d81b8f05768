//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::AttendanceError;
use crate::export::{export_attendance, ExportRequest};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn get(path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: "GET".to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "University Attendance System".to_string(),
        version: state.version.clone(),
        description: "Attendance matrix export service".to_string(),
        endpoints: vec![
            EndpointInfo::get("/health", "Health check endpoint"),
            EndpointInfo::get("/version", "Get server version"),
            EndpointInfo::get(
                "/api/export",
                "Export class attendance (classId, sectionId, format=excel)",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "University Attendance System is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub formats: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        formats: vec!["excel".to_string()],
    }))
}

/// GET /api/export - Stream the attendance workbook for a class/section
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(request): Query<ExportRequest>,
) -> Response {
    match export_attendance(state.store.as_ref(), &request).await {
        Ok(workbook) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, workbook.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&workbook.filename),
                ),
            ],
            workbook.bytes,
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `attachment` disposition with the filename as a quoted string
fn content_disposition(filename: &str) -> String {
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{}\"", escaped)
}

/// Map an [`AttendanceError`] to a JSON error body with the matching status
pub fn error_response(err: &AttendanceError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Export failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "Export rejected");
    }
    (status, Json(ApiResponse::<()>::err(err.to_string()))).into_response()
}
