use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::{export::RenderError, models::document::StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} failed")]
    Upstream(&'static str, #[source] RenderError),
    #[error("{0} is not configured")]
    Config(&'static str),
    #[error("Could not save document")]
    Persistence(#[source] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(..) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            AppError::Upstream(_, source) => Some(source.to_string()),
            AppError::Persistence(source) => Some(source.to_string()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => AppError::NotFound("Document"),
            StoreError::InvalidId => AppError::BadRequest("Invalid document id".to_string()),
            other => AppError::Persistence(other),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::NotConfigured(service) => AppError::Config(service),
            other => AppError::Upstream("Document rendering", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn errors_render_json_with_matching_status() {
        let response = AppError::Validation("Supervisor is required".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body()).await.unwrap_or_default();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
        assert_eq!(json["error"], "Supervisor is required");
        assert!(json.get("details").is_none());
    }

    #[actix_web::test]
    async fn upstream_errors_carry_details() {
        let error: AppError = RenderError::Status(503).into();
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body()).await.unwrap_or_default();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
        assert_eq!(json["error"], "Document rendering failed");
        assert_eq!(json["details"], "renderer responded with status 503");
    }

    #[test]
    fn missing_config_is_a_server_error() {
        let error: AppError = RenderError::NotConfigured("PDF renderer").into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "PDF renderer is not configured");
    }
}
