//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use sovereign_agents::{
    DeskError, DeskSession, PanelInput, PanelReport, PanelSpec, SessionId, SessionStore,
    TabularDataset, TaskCategory, catalogue,
};
use sovereign_core::provider::ModelInfo;

use crate::state::AppState;

/// Header carrying the desk session id
pub const SESSION_HEADER: &str = "x-session-id";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
    pub default_model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub message: &'static str,
    pub columns: Vec<String>,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct CatalogueResponse {
    pub panels: Vec<PanelSpec>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn desk_error(err: &DeskError) -> ApiError {
    match err {
        DeskError::MissingInput(_) | DeskError::UnknownFilingType(_) => {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), "VALIDATION_ERROR")
        }
        DeskError::UnknownPanel(_) => {
            api_error(StatusCode::NOT_FOUND, err.to_string(), "UNKNOWN_PANEL")
        }
        DeskError::Dataset(_) => {
            api_error(StatusCode::BAD_REQUEST, err.to_string(), "INVALID_DATASET")
        }
        DeskError::Session(_) => {
            tracing::error!("Session store error: {}", err);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable", "SESSION_ERROR")
        }
    }
}

fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(SessionId::from_string)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
        default_model: state.desk.gateway().config().default_model.clone(),
    })
}

/// Models offered by the provider
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    state.provider.list_models().await.map(Json).map_err(|e| {
        tracing::warn!("Model listing failed: {}", e);
        api_error(StatusCode::BAD_GATEWAY, e.user_message(), "PROVIDER_ERROR")
    })
}

/// Panel catalogue in tab order
pub async fn list_panels() -> Json<CatalogueResponse> {
    Json(CatalogueResponse {
        panels: catalogue(),
    })
}

/// Store an uploaded CSV in the caller's session
pub async fn upload_dataset(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<UploadResponse>, ApiError> {
    let dataset = TabularDataset::from_csv_str(&body).map_err(|e| {
        tracing::warn!("Rejected upload: {}", e);
        desk_error(&e)
    })?;

    // Ids the store did not issue start a fresh session
    let existing = match session_id(&headers) {
        Some(id) => state.sessions.load(&id).map_err(|e| desk_error(&e))?,
        None => None,
    };
    let mut session = existing.unwrap_or_else(DeskSession::new);
    let id = session.id.clone();

    let columns = dataset
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let rows = dataset.row_count();
    session.attach(dataset);
    state.sessions.save(&session).map_err(|e| desk_error(&e))?;

    tracing::info!(session = %id, rows, "Dataset uploaded");

    Ok(Json(UploadResponse {
        session_id: id.to_string(),
        message: "Data uploaded successfully.",
        columns,
        rows,
    }))
}

/// Discard the caller's uploaded data
pub async fn clear_dataset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    if let Some(id) = session_id(&headers) {
        state.sessions.delete(&id).map_err(|e| desk_error(&e))?;
        tracing::info!(session = %id, "Dataset cleared");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Run one panel action
pub async fn run_panel(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(input): Json<PanelInput>,
) -> Result<Json<PanelReport>, ApiError> {
    let panel = TaskCategory::from_slug(&slug).map_err(|e| desk_error(&e))?;

    let dataset = match session_id(&headers) {
        Some(id) => state.sessions.dataset(&id).map_err(|e| desk_error(&e))?,
        None => TabularDataset::empty(),
    };

    let report = state
        .desk
        .run(panel, &input, &dataset)
        .await
        .map_err(|e| desk_error(&e))?;

    Ok(Json(report))
}
