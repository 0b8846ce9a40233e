//! HTTP surface over the dispatcher.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::metrics::MetricsReport;
use crate::model::{Category, TranslationRequest, TranslationResult, TranslatorDescriptor};
use crate::security::{api_key_matches, bearer_token};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Bearer key required on `/api/*` routes. `None` leaves them open.
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl ErrorResponse {
    fn new(kind: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            e if e.is_caller_error() => match e {
                DispatchError::ToolNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            DispatchError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(kind = self.kind(), "Request failed: {}", self);
        }
        (status, Json(ErrorResponse::new(self.kind(), self.to_string()))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolsQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate))
        .route("/api/tools", get(list_tools))
        .route("/api/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);

    if api_key_matches(provided, state.api_key.as_deref()) {
        Ok(())
    } else {
        warn!("Rejected request with missing or invalid API key");
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("unauthorized", "Missing or invalid API key")),
        ))
    }
}

async fn translate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<TranslationResult>, Response> {
    authorize(&state, &headers).map_err(IntoResponse::into_response)?;

    state
        .dispatcher
        .dispatch(&request)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

async fn list_tools(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ToolsQuery>,
) -> Result<Json<Vec<TranslatorDescriptor>>, ApiError> {
    authorize(&state, &headers)?;

    let category = match query.category.as_deref() {
        None => None,
        Some(raw) => Some(raw.parse::<Category>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("invalid_input", e)),
            )
        })?),
    };

    let registry = state.dispatcher.registry();
    let tools = registry
        .search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .filter(|d| category.map_or(true, |c| d.category == c))
        .collect();

    Ok(Json(tools))
}

async fn metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MetricsReport>, ApiError> {
    authorize(&state, &headers)?;
    Ok(Json(state.dispatcher.metrics().report()))
}
