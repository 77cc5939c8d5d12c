use axum::{
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::engine::Engine;
use crate::error::{EngineError, FailureCategory};

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptResponse {
    pub video_id: String,
    pub profanity: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the HTTP router around a running engine.
pub fn router(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ]);

    Router::new()
        .route("/transcript/:video_id", get(get_transcript))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn health() -> &'static str {
    "OK"
}

async fn get_transcript(
    State(engine): State<Arc<Engine>>,
    Path(video_id): Path<String>,
    Query(query): Query<TranscriptQuery>,
) -> Response {
    info!(
        "Processing request for video: {}, language: {}",
        video_id,
        query.lang.as_deref().unwrap_or("default")
    );

    let verdict = match engine.submit(&video_id, query.lang.as_deref()).await {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!("Could not process video {}: {}", video_id, e);
            return error_response(engine_error_status(&e), e.to_string());
        }
    };

    match verdict.failure {
        None => {
            info!(
                "Returning response for video {}: profanity={}",
                verdict.identifier, verdict.flagged
            );
            Json(TranscriptResponse {
                video_id: verdict.identifier,
                profanity: verdict.flagged,
            })
            .into_response()
        }
        Some(failure) => {
            warn!("Error processing video {}: {}", verdict.identifier, failure.message);
            error_response(failure_status(failure.category), failure.message)
        }
    }
}

pub fn failure_status(category: FailureCategory) -> StatusCode {
    match category {
        FailureCategory::NotFound => StatusCode::NOT_FOUND,
        FailureCategory::Forbidden => StatusCode::FORBIDDEN,
        FailureCategory::Other => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn engine_error_status(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidJob(_) => StatusCode::BAD_REQUEST,
        EngineError::Closed => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::WorkerGone => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
