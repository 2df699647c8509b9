//! Error type returned by the HTTP handlers
//!
//! Every failure is rendered as `{ "error": message }`. Upstream and
//! unexpected failures map to 500, rejected query parameters to 400.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::data::WebflowError;

/// Errors surfaced by the listing endpoint
#[derive(Debug, Error)]
pub enum ListingError {
    /// Refreshing the snapshot from Webflow failed
    #[error(transparent)]
    Upstream(#[from] WebflowError),

    /// Query parameters could not be interpreted
    #[error("{0}")]
    InvalidQuery(String),

    /// Anything else, including a panicking handler
    #[error("{0}")]
    Unexpected(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ListingError {
    /// HTTP status the error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ListingError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ListingError::Upstream(_) | ListingError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Listing request failed");
        } else {
            tracing::warn!(error = %self, "Listing request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into a 500 response with the same JSON shape
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unexpected error".to_string()
    };

    ListingError::Unexpected(message).into_response()
}
