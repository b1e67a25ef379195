//! HTTP boundary.
//!
//! Exposes the two pipeline stages and a health probe as JSON endpoints.
//! Errors are returned as `{"detail": "..."}` with 400 for caller mistakes and
//! 500 for everything else.

use crate::ai::Interpretation;
use crate::models::{
    ErrorResponse, GenerateSchemaRequest, GenerateSchemaResponse, HealthResponse,
    RenderImageRequest,
};
use crate::pipeline::Pipeline;
use crate::Error;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

/// An [`Error`] tagged with the stage it came from, for the response message.
struct ApiError {
    stage: &'static str,
    error: Error,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = if self.error.is_client_error() {
            warn!("{} rejected: {}", self.stage, self.error);
            (StatusCode::BAD_REQUEST, self.error.to_string())
        } else {
            error!("{} failed: {}", self.stage, self.error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{} failed: {}", self.stage, self.error),
            )
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Build the gateway routes. Bodies are unbounded since whole PDFs arrive
/// base64-encoded in the JSON payload.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/api/generate-schema", post(generate_schema_handler))
        .route("/api/render-image", post(render_image_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(pipeline)
}

async fn generate_schema_handler(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<GenerateSchemaRequest>,
) -> Result<Json<GenerateSchemaResponse>, ApiError> {
    let span = info_span!("generate_schema", request_id = %Uuid::new_v4());

    pipeline
        .generate_schema(&request)
        .instrument(span)
        .await
        .map(|schema| Json(GenerateSchemaResponse { schema }))
        .map_err(|error| ApiError {
            stage: "Schema generation",
            error,
        })
}

async fn render_image_handler(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<RenderImageRequest>,
) -> Result<Json<Interpretation>, ApiError> {
    let span = info_span!("render_image", request_id = %Uuid::new_v4());

    pipeline
        .render_image(&request)
        .instrument(span)
        .await
        .map(Json)
        .map_err(|error| ApiError {
            stage: "Image rendering",
            error,
        })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
