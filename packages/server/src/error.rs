//! API error type and its JSON envelope.

use std::fmt::Display;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use edustats_server_models::ApiErrorBody;
use thiserror::Error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request parameter.
    #[error("{0}")]
    BadRequest(String),

    /// No route matched the request.
    #[error("{0}")]
    NotFound(String),

    /// A query failed. The message is generic; the cause is logged.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns a closure that logs a query failure and maps it to a
    /// generic internal error mentioning `what`.
    pub fn internal<E: Display>(what: &'static str) -> impl FnOnce(E) -> Self {
        move |e| {
            log::error!("Failed to query {what}: {e}");
            Self::Internal(format!("Failed to query {what}"))
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrorBody {
            success: false,
            error: self.to_string(),
        })
    }
}
