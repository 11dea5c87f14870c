use super::types::{
    AutocompleteResponse, ErrorResponse, InitResponse, SubmitTermRequest, SuggestParams,
    Suggestion, TopParams, limit_from,
};
use crate::service::AutocompleteService;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, extract::Query, http::StatusCode};
use std::sync::Arc;
use std::time::Instant;

pub const ENDPOINT_SUGGEST: &str = "/api/autocomplete/suggest";
pub const ENDPOINT_SUBMIT: &str = "/api/autocomplete/submit";
pub const ENDPOINT_TOP: &str = "/api/autocomplete/top";
pub const ENDPOINT_INIT: &str = "/api/autocomplete/init";

/// Limit applied when the caller does not send one.
pub const DEFAULT_LIMIT: usize = 10;
/// Longest term accepted by the submit endpoint, in characters.
pub const MAX_TERM_LENGTH: usize = 255;

pub fn router(service: Arc<AutocompleteService>) -> Router {
    Router::new()
        .route(ENDPOINT_SUGGEST, get(handle_suggest))
        .route(ENDPOINT_SUBMIT, post(handle_submit))
        .route(ENDPOINT_TOP, get(handle_top))
        .route(ENDPOINT_INIT, post(handle_init))
        .layer(Extension(service))
}

pub async fn handle_suggest(
    Extension(service): Extension<Arc<AutocompleteService>>,
    Query(params): Query<SuggestParams>,
) -> (StatusCode, Json<AutocompleteResponse>) {
    let started = Instant::now();
    let limit = limit_from(params.limit, DEFAULT_LIMIT);

    let suggestions = service.get_suggestions(&params.prefix, limit);

    (
        StatusCode::OK,
        Json(AutocompleteResponse {
            prefix: params.prefix,
            suggestions,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }),
    )
}

pub async fn handle_submit(
    Extension(service): Extension<Arc<AutocompleteService>>,
    Json(req): Json<SubmitTermRequest>,
) -> Response {
    if let Some(problem) = validate_term(&req.term) {
        tracing::debug!("Rejected submitted term: {}", problem);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: problem,
                partially_durable: false,
            }),
        )
            .into_response();
    }

    match service.save_term(&req.term).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "term must not be blank".to_string(),
                partially_durable: false,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to save term: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                    partially_durable: e.is_partially_durable(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn handle_top(
    Extension(service): Extension<Arc<AutocompleteService>>,
    Query(params): Query<TopParams>,
) -> (StatusCode, Json<Vec<Suggestion>>) {
    let limit = limit_from(params.limit, DEFAULT_LIMIT);
    (StatusCode::OK, Json(service.top_terms(limit)))
}

pub async fn handle_init(
    Extension(service): Extension<Arc<AutocompleteService>>,
) -> (StatusCode, Json<InitResponse>) {
    match service.seed_sample_data().await {
        Ok(seeded) => (
            StatusCode::OK,
            Json(InitResponse {
                seeded,
                message: "sample data initialized".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to seed sample data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InitResponse {
                    seeded: 0,
                    message: e.to_string(),
                }),
            )
        }
    }
}

fn validate_term(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        return Some("term must not be blank".to_string());
    }
    if term.chars().count() > MAX_TERM_LENGTH {
        return Some(format!(
            "term must be between 1 and {} characters",
            MAX_TERM_LENGTH
        ));
    }
    None
}
