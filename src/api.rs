// src/api.rs
//! Local HTTP surface: a thin mapper from requests to [`PrintService`] calls.
use crate::config::ServerConfig;
use crate::error::PrintError;
use crate::job::PrintPayload;
use crate::service::PrintService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use printdesk_traits::PrinterCatalog;
use serde_json::json;
use std::io;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<PrintService>,
    pub catalog: Arc<dyn PrinterCatalog>,
}

impl ApiState {
    pub fn new(service: Arc<PrintService>, catalog: Arc<dyn PrinterCatalog>) -> Self {
        Self { service, catalog }
    }
}

pub fn router(state: ApiState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/printers", get(printers))
        .route("/print", post(print))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(cors_layer(&server.allowed_origins))
        .with_state(state)
}

/// Binds `host:port` and serves until the listener fails.
pub async fn serve(state: ApiState, server: &ServerConfig) -> io::Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.inspect_err(|e| {
        error!("[API] Failed to bind {}: {}", addr, e);
    })?;

    info!("[API] Listening on http://{}", addr);
    axum::serve(listener, router(state, server)).await
}

/// `"*"` anywhere in the list, or an empty list, allows every origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("[API] Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "platform": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "version": env!("CARGO_PKG_VERSION"),
        "pendingJobs": state.service.pending_jobs(),
    }))
}

async fn printers(State(state): State<ApiState>) -> Response {
    match state.catalog.list().await {
        Ok(printers) => Json(json!({ "printers": printers })).into_response(),
        Err(e) => {
            error!("[API] Failed to list printers: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to list printers" })),
            )
                .into_response()
        }
    }
}

async fn print(
    State(state): State<ApiState>,
    payload: Result<Json<PrintPayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!("[API] Unreadable print request: {}", rejection.body_text());
            return error_response(PrintError::InvalidPayload);
        }
    };

    match state.service.print(payload).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!("[API] Print job failed: {} ({})", e, e.code());
            error_response(e)
        }
    }
}

fn error_response(e: PrintError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": e.to_string(), "code": e.code() }))).into_response()
}
