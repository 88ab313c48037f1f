// Route exports
pub mod search;
pub mod statistics;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Aggregator, CoreError, Matcher};
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{RecordStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub matcher: Matcher,
    pub aggregator: Aggregator,
    pub request_timeout: Duration,
    /// Backend name reported by the health endpoint
    pub backend: &'static str,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        aggregator: Aggregator,
        request_timeout: Duration,
        backend: &'static str,
    ) -> Self {
        Self {
            matcher: Matcher::new(store.clone()),
            store,
            aggregator,
            request_timeout,
            backend,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(search::configure)
            .configure(statistics::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = matches!(
        tokio::time::timeout(state.request_timeout, state.store.health_check()).await,
        Ok(Ok(true))
    );

    let status = if healthy {
        "healthy"
    } else {
        tracing::warn!("Health check: {} store is not answering", state.backend);
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.backend.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run a core call under the request deadline
///
/// An elapsed deadline is reported the same way as a failed store query.
pub(crate) async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CoreError::StoreUnavailable(StoreError::Timeout(limit))),
    }
}

/// Map a core error to its JSON error response
pub fn error_response(err: &CoreError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status).json(ErrorResponse {
        error: err.kind().to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

/// JSON error body for extractor failures
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}
