// Route exports
pub mod fighters;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use crate::models::ErrorResponse;
use crate::services::ResolveError;

pub use fighters::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(fighters::configure),
    );
}

impl error::ResponseError for ResolveError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ResolveError::MalformedUpstream(e) => {
                tracing::error!("Upstream contract violation: {}", e)
            }
            ResolveError::UpstreamUnavailable(e) => tracing::warn!("Upstream failure: {}", e),
            _ => tracing::debug!("Request rejected: {}", self),
        }

        HttpResponse::build(error::ResponseError::status_code(self)).json(ErrorResponse {
            error: self.user_message(),
            code: self.kind().to_string(),
            status_code: self.http_status(),
        })
    }
}

/// JSON error for query strings that fail to deserialize
#[derive(Debug, serde::Serialize)]
pub struct QueryError {
    pub error: String,
    pub code: String,
    pub status_code: u16,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.error)
    }
}

impl std::error::Error for QueryError {}

impl error::ResponseError for QueryError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    QueryError {
        error: format!("Invalid query: {}", err),
        code: "invalid_query".to_string(),
        status_code: 400,
    }
    .into()
}
