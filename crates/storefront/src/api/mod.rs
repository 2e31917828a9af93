//! Clients for the storefront's HTTP API.
//!
//! # Endpoints
//!
//! - `GET /api/products` - catalog listing ([`CatalogClient`])
//! - `POST /api/try-on` - virtual try-on inference ([`TryOnClient`])
//!
//! Both clients are cheap to clone; clones share one `reqwest` connection
//! pool.

mod catalog;
mod try_on;

pub use catalog::CatalogClient;
pub use try_on::{
    TRY_ON_SEED, TRY_ON_STEPS, TryOnBackend, TryOnClient, TryOnRequest, TryOnResponse,
};

use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status without a usable body.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but is missing required fields.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The service reported that it could not produce a result.
    #[error("Rejected by service: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Whether the service itself answered with an application-level failure,
    /// as opposed to the request never producing a usable answer.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Truncate a response body for logging.
fn body_excerpt(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        assert!(ApiError::Rejected("bad image".to_string()).is_rejection());
        assert!(!ApiError::MalformedResponse("x".to_string()).is_rejection());
        assert!(
            !ApiError::Status {
                status: 500,
                message: String::new()
            }
            .is_rejection()
        );
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Rejected("bad image".to_string());
        assert_eq!(err.to_string(), "Rejected by service: bad image");
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let body = "x".repeat(2000);
        assert_eq!(body_excerpt(&body).len(), 500);
        assert_eq!(body_excerpt("short"), "short");
    }
}
