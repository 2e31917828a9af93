//! Try-on inference API client.
//!
//! A try-on is a single multipart `POST` carrying the product ID, the
//! shopper's photo and two fixed generation parameters. The service answers
//! with `{ "success": bool, "result_url"?: string, "error"?: string }`; the
//! body is interpreted regardless of HTTP status.

use std::future::Future;
use std::sync::Arc;

use fitting_room_core::{PersonImage, ProductId};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{ApiError, body_excerpt};
use crate::config::ClientConfig;

/// Generation seed sent with every request.
pub const TRY_ON_SEED: u32 = 42;

/// Denoising step count sent with every request.
pub const TRY_ON_STEPS: u32 = 30;

/// Input for one try-on.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub product_id: ProductId,
    pub person_image: PersonImage,
    pub seed: u32,
    pub steps: u32,
}

impl TryOnRequest {
    /// Build a request with the fixed seed and step count.
    #[must_use]
    pub const fn new(product_id: ProductId, person_image: PersonImage) -> Self {
        Self {
            product_id,
            person_image,
            seed: TRY_ON_SEED,
            steps: TRY_ON_STEPS,
        }
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let photo = Part::bytes(self.person_image.bytes().to_vec())
            .file_name(self.person_image.file_name().to_string())
            .mime_str(self.person_image.mime_type())?;

        Ok(Form::new()
            .text("product_id", self.product_id.into_inner())
            .part("person_image", photo)
            .text("seed", self.seed.to_string())
            .text("steps", self.steps.to_string()))
    }
}

/// Body returned by the try-on endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TryOnResponse {
    /// Absent on some service errors; treated as `false`.
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TryOnResponse {
    /// Turn the response into the result image URL.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Rejected`] when the service reports failure
    /// - [`ApiError::MalformedResponse`] when success carries no URL
    pub fn into_result_url(self) -> Result<String, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        self.result_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("success without result_url".to_string()))
    }
}

/// Something that can turn a photo and a product into a try-on image URL.
///
/// [`TryOnClient`] is the HTTP implementation; the seam lets the request
/// flow be exercised without a network.
pub trait TryOnBackend: Send + Sync + 'static {
    /// Run one try-on and return the result image URL.
    fn try_on(
        &self,
        request: TryOnRequest,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;
}

/// HTTP client for the try-on endpoint.
#[derive(Clone)]
pub struct TryOnClient {
    inner: Arc<TryOnClientInner>,
}

struct TryOnClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl TryOnClient {
    /// Create a new try-on client.
    #[must_use]
    pub fn new(config: &ClientConfig, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(TryOnClientInner {
                client,
                endpoint: config.try_on_url(),
            }),
        }
    }

    /// Endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    async fn post(&self, request: TryOnRequest) -> Result<String, ApiError> {
        debug!(
            photo_bytes = request.person_image.len(),
            seed = request.seed,
            steps = request.steps,
            "Sending try-on request"
        );
        let form = request.into_form()?;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: TryOnResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                status = %status,
                error = %e,
                body = %body_excerpt(&body),
                "Failed to parse try-on response"
            );
            e
        })?;

        if !status.is_success() {
            debug!(status = %status, "Try-on endpoint returned non-success status with JSON body");
        }

        parsed.into_result_url()
    }
}

impl TryOnBackend for TryOnClient {
    fn try_on(
        &self,
        request: TryOnRequest,
    ) -> impl Future<Output = Result<String, ApiError>> + Send {
        self.post(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_fixed_parameters() {
        let request = TryOnRequest::new(
            ProductId::new("p1"),
            PersonImage::new(vec![1, 2, 3], "image/png", "me.png"),
        );
        assert_eq!(request.seed, 42);
        assert_eq!(request.steps, 30);
    }

    #[test]
    fn test_request_rejects_invalid_mime() {
        let request = TryOnRequest::new(
            ProductId::new("p1"),
            PersonImage::new(vec![1], "not a mime", "me.png"),
        );
        assert!(matches!(request.into_form(), Err(ApiError::Http(_))));
    }

    #[test]
    fn test_success_response() {
        let response: TryOnResponse =
            serde_json::from_str(r#"{"success":true,"result_url":"http://x/r1.png"}"#).unwrap();
        assert_eq!(response.into_result_url().unwrap(), "http://x/r1.png");
    }

    #[test]
    fn test_failure_response_carries_message() {
        let response: TryOnResponse =
            serde_json::from_str(r#"{"success":false,"error":"bad image"}"#).unwrap();
        assert!(matches!(
            response.into_result_url(),
            Err(ApiError::Rejected(msg)) if msg == "bad image"
        ));
    }

    #[test]
    fn test_error_without_success_flag_is_failure() {
        let response: TryOnResponse =
            serde_json::from_str(r#"{"error":"unknown product id"}"#).unwrap();
        assert!(matches!(
            response.into_result_url(),
            Err(ApiError::Rejected(msg)) if msg == "unknown product id"
        ));
    }

    #[test]
    fn test_success_without_url_is_malformed() {
        let response: TryOnResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            response.into_result_url(),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_failure_without_message() {
        let response = TryOnResponse::default();
        assert!(matches!(
            response.into_result_url(),
            Err(ApiError::Rejected(msg)) if msg == "unknown error"
        ));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ClientConfig::new("http://localhost:8000", ".unused").unwrap();
        let client = TryOnClient::new(&config, reqwest::Client::new());
        assert_eq!(client.endpoint(), "http://localhost:8000/api/try-on");
    }
}
