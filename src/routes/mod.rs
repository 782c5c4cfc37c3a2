// Route exports
pub mod matching;

use actix_web::{error, http::StatusCode, web, HttpResponse};

use crate::core::MatchingError;
use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matching::configure),
    );
}

/// JSON error response for JSON payload errors
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
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.error.clone(),
            message: self.message.clone(),
            status_code: self.status_code,
        })
    }
}

/// Handle JSON payload errors
///
/// Only covers bodies that fail to deserialize. Roster invariants are checked
/// afterwards and answered through `MatchingError`.
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

impl error::ResponseError for MatchingError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = if self.is_validation() {
            ErrorResponse {
                error: "Validation failed".to_string(),
                message: self.to_string(),
                status_code: status.as_u16(),
            }
        } else {
            // Engine details stay in the logs
            tracing::error!("Matching computation failed: {}", self);
            ErrorResponse {
                error: "Computation failed".to_string(),
                message: "The matching could not be computed".to_string(),
                status_code: status.as_u16(),
            }
        };
        HttpResponse::build(status).json(body)
    }
}
