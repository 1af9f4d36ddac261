//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use super::models::ImportRequest;
use crate::config::SegmentTuning;
use crate::import::ImportError;
use crate::service::SegmentService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SegmentService>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(service: Arc<SegmentService>, port: u16) -> Result<()> {
    info!("🚀 Starting HTTP server on port {}", port);

    let app_state = AppState { service };

    // Configure CORS to allow browser access from the admin surface
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/import", post(import_handler))
        .route("/api/items/:id/segments", get(item_segments_handler))
        .route("/api/statistics", get(statistics_handler))
        .route("/api/clear", post(clear_handler))
        .route(
            "/api/tuning",
            get(get_tuning_handler).put(update_tuning_handler),
        )
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    match handlers::health_check().await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Import handler
async fn import_handler(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> impl IntoResponse {
    match handlers::import_csv(&state.service, &request.csv).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            let status = match e {
                ImportError::InvalidInput => StatusCode::BAD_REQUEST,
                ImportError::CatalogUnavailable(_)
                | ImportError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            (
                status,
                Json(serde_json::json!({
                    "success": false,
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Per-item segment query handler
async fn item_segments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let segments = handlers::item_segments(&state.service, &id).await;
    (StatusCode::OK, Json(segments)).into_response()
}

/// Statistics handler
async fn statistics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = handlers::statistics(&state.service).await;
    (StatusCode::OK, Json(stats)).into_response()
}

/// Destructive clear handler
async fn clear_handler(State(state): State<AppState>) -> impl IntoResponse {
    match handlers::clear_records(&state.service).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"success": false, "error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Tuning read handler
async fn get_tuning_handler(State(state): State<AppState>) -> impl IntoResponse {
    let tuning = handlers::get_tuning(&state.service).await;
    (StatusCode::OK, Json(tuning)).into_response()
}

/// Tuning update handler
async fn update_tuning_handler(
    State(state): State<AppState>,
    Json(tuning): Json<SegmentTuning>,
) -> impl IntoResponse {
    match handlers::update_tuning(&state.service, tuning).await {
        Ok(tuning) => (StatusCode::OK, Json(tuning)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
