//! Integration tests for Fitting Room.
//!
//! Tests run the real HTTP clients against [`StubServer`], an in-process
//! axum app that serves a catalog and answers try-on requests, bound to an
//! ephemeral port. Nothing outside the test process is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fitting-room-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - product listing and caching
//! - `try_on_flow` - multipart requests, results and failure notices
//! - `persistence` - cart, photo and gallery surviving a restart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fitting_room_core::{PersonImage, Price, Product, ProductId};
use fitting_room_storefront::{Notice, Notifier};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// =============================================================================
// Stub server
// =============================================================================

/// How the stub answers `POST /api/try-on`.
#[derive(Debug, Clone)]
pub enum TryOnReply {
    /// `{"success": true, "result_url": "<base>/results/<product_id>.png"}`
    Echo,
    /// Fixed JSON body with the given status.
    Json(StatusCode, Value),
    /// Fixed non-JSON body with the given status.
    Raw(StatusCode, String),
}

/// One try-on request as the stub received it.
#[derive(Debug, Clone, Default)]
pub struct RecordedTryOn {
    pub product_id: Option<String>,
    pub seed: Option<String>,
    pub steps: Option<String>,
    pub photo: Option<RecordedFile>,
}

/// A file part of a multipart request.
#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

struct StubState {
    base_url: String,
    products: Mutex<Value>,
    catalog_status: Mutex<StatusCode>,
    catalog_hits: AtomicUsize,
    reply: Mutex<TryOnReply>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<RecordedTryOn>>,
}

/// In-process stand-in for the storefront API.
pub struct StubServer {
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Start a stub serving `products` as the catalog.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start(products: Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();

        let state = Arc::new(StubState {
            base_url: format!("http://{addr}"),
            products: Mutex::new(products),
            catalog_status: Mutex::new(StatusCode::OK),
            catalog_hits: AtomicUsize::new(0),
            reply: Mutex::new(TryOnReply::Echo),
            delay: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/try-on", post(try_on))
            .with_state(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { state, handle }
    }

    /// Start a stub serving [`sample_catalog`].
    pub async fn with_sample_catalog() -> Self {
        Self::start(sample_catalog()).await
    }

    /// Base URL to configure clients with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    /// Change how try-on requests are answered.
    pub fn set_try_on_reply(&self, reply: TryOnReply) {
        *lock(&self.state.reply) = reply;
    }

    /// Hold every try-on response for `delay`.
    pub fn set_try_on_delay(&self, delay: Duration) {
        *lock(&self.state.delay) = Some(delay);
    }

    /// Replace the catalog.
    pub fn set_products(&self, products: Value) {
        *lock(&self.state.products) = products;
    }

    /// Answer catalog requests with `status` and an error body.
    pub fn set_catalog_status(&self, status: StatusCode) {
        *lock(&self.state.catalog_status) = status;
    }

    /// Number of catalog requests served.
    #[must_use]
    pub fn catalog_hits(&self) -> usize {
        self.state.catalog_hits.load(Ordering::SeqCst)
    }

    /// Try-on requests received so far.
    #[must_use]
    pub fn try_on_requests(&self) -> Vec<RecordedTryOn> {
        lock(&self.state.requests).clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn list_products(State(state): State<Arc<StubState>>) -> Response {
    state.catalog_hits.fetch_add(1, Ordering::SeqCst);

    let status = *lock(&state.catalog_status);
    if !status.is_success() {
        return (status, "catalog unavailable").into_response();
    }

    Json(lock(&state.products).clone()).into_response()
}

async fn try_on(State(state): State<Arc<StubState>>, mut multipart: Multipart) -> Response {
    let mut recorded = RecordedTryOn::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return e.into_response(),
        };

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return e.into_response(),
        };

        match name.as_str() {
            "product_id" => recorded.product_id = Some(text(&bytes)),
            "seed" => recorded.seed = Some(text(&bytes)),
            "steps" => recorded.steps = Some(text(&bytes)),
            "person_image" => {
                recorded.photo = Some(RecordedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let product_id = recorded.product_id.clone().unwrap_or_default();
    lock(&state.requests).push(recorded);

    let delay = *lock(&state.delay);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = lock(&state.reply).clone();
    match reply {
        TryOnReply::Echo => Json(json!({
            "success": true,
            "result_url": format!("{}/results/{product_id}.png", state.base_url),
        }))
        .into_response(),
        TryOnReply::Json(status, body) => (status, Json(body)).into_response(),
        TryOnReply::Raw(status, body) => (status, body).into_response(),
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// =============================================================================
// Fixtures
// =============================================================================

/// Three-product catalog in the API's wire format.
#[must_use]
pub fn sample_catalog() -> Value {
    json!([
        {
            "id": "p1",
            "name": "Check Shirt",
            "price": 89000,
            "image": "/images/shirt_check.jpg",
            "category": "Top"
        },
        {
            "id": "p2",
            "name": "Denim Jacket",
            "price": 129000,
            "image": "/images/denim_jacket.jpg",
            "category": "Outer"
        },
        {
            "id": "p3",
            "name": "Wide Slacks",
            "price": 59000.5,
            "image": "/images/wide_slacks.jpg",
            "category": "Bottom"
        }
    ])
}

/// A product as the client would hold it.
#[must_use]
pub fn product(id: &str, name: &str, units: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_units(units),
        image: format!("/images/{id}.jpg"),
        category: "Top".to_string(),
    }
}

/// A small PNG-typed photo.
#[must_use]
pub fn photo() -> PersonImage {
    PersonImage::new(vec![0x89, b'P', b'N', b'G', 1, 2, 3], "image/png", "me.png")
}

/// Base URL of a local port nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be bound.
#[allow(clippy::unwrap_used)]
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// Notifier
// =============================================================================

/// Collects notices for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create a shared recorder.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}
