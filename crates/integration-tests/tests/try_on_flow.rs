//! Integration tests for the try-on request flow over HTTP.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use fitting_room_core::{ProductId, TryOnStatus};
use fitting_room_integration_tests::{
    RecordingNotifier, StubServer, TryOnReply, photo, product, unreachable_base_url,
};
use fitting_room_storefront::{
    ApiError, ClientConfig, ClientError, MemoryStorage, Notice, Session, TryOnError,
};
use serde_json::json;

fn session_for(base_url: &str) -> (Session, Arc<RecordingNotifier>) {
    let config = ClientConfig::new(base_url, ".unused").unwrap();
    let notifier = RecordingNotifier::shared();
    let session = Session::with_storage(config, Arc::new(MemoryStorage::new()), notifier.clone());
    (session, notifier)
}

/// Session with `ids` in the cart and a photo set.
async fn ready_session(server: &StubServer, ids: &[&str]) -> (Session, Arc<RecordingNotifier>) {
    let (mut session, notifier) = session_for(server.base_url());
    for id in ids {
        session.add_to_cart_by_id(&ProductId::new(*id)).await.unwrap();
    }
    session.set_person_image(Some(photo()));
    (session, notifier)
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn test_request_carries_product_photo_and_parameters() {
    let server = StubServer::with_sample_catalog().await;
    let (session, notifier) = ready_session(&server, &["p1"]).await;

    let url = session.try_on(&ProductId::new("p1")).await.unwrap();

    assert_eq!(url, format!("{}/results/p1.png", server.base_url()));
    let requests = server.try_on_requests();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.product_id.as_deref(), Some("p1"));
    assert_eq!(request.seed.as_deref(), Some("42"));
    assert_eq!(request.steps.as_deref(), Some("30"));

    let sent = request.photo.as_ref().unwrap();
    assert_eq!(sent.file_name.as_deref(), Some("me.png"));
    assert_eq!(sent.content_type.as_deref(), Some("image/png"));
    assert_eq!(sent.bytes, photo().bytes());

    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_success_records_result() {
    let server = StubServer::with_sample_catalog().await;
    let (session, _) = ready_session(&server, &["p1"]).await;
    let id = ProductId::new("p1");

    session.try_on(&id).await.unwrap();

    assert_eq!(session.try_on_status(&id), TryOnStatus::Succeeded);
    assert_eq!(
        session.try_on_result(&id),
        Some(format!("{}/results/p1.png", server.base_url()))
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_service_rejection_is_notified_with_message() {
    let server = StubServer::with_sample_catalog().await;
    server.set_try_on_reply(TryOnReply::Json(
        StatusCode::OK,
        json!({ "success": false, "error": "bad image" }),
    ));
    let (session, notifier) = ready_session(&server, &["p1"]).await;
    let id = ProductId::new("p1");

    let result = session.try_on(&id).await;

    assert!(matches!(
        result,
        Err(ClientError::TryOn(TryOnError::Api(ApiError::Rejected(ref msg)))) if msg == "bad image"
    ));
    assert_eq!(session.try_on_status(&id), TryOnStatus::Failed);
    assert!(session.try_on_result(&id).is_none());

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].to_string().contains("bad image"));
    assert!(notices[0].to_string().contains("Check Shirt"));
}

#[tokio::test]
async fn test_error_status_body_is_still_read() {
    let server = StubServer::with_sample_catalog().await;
    server.set_try_on_reply(TryOnReply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": "model crashed" }),
    ));
    let (session, notifier) = ready_session(&server, &["p1"]).await;

    session.try_on(&ProductId::new("p1")).await.unwrap_err();

    assert_eq!(
        notifier.notices(),
        [Notice::TryOnFailed {
            product_name: "Check Shirt".to_string(),
            message: "model crashed".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_non_json_reply_reports_server_unreachable() {
    let server = StubServer::with_sample_catalog().await;
    server.set_try_on_reply(TryOnReply::Raw(
        StatusCode::BAD_GATEWAY,
        "<html>upstream down</html>".to_string(),
    ));
    let (session, notifier) = ready_session(&server, &["p1"]).await;

    let result = session.try_on(&ProductId::new("p1")).await;

    assert!(matches!(
        result,
        Err(ClientError::TryOn(TryOnError::Api(ApiError::Parse(_))))
    ));
    assert_eq!(notifier.notices(), [Notice::ServerUnreachable]);
}

#[tokio::test]
async fn test_unreachable_server_reports_server_unreachable() {
    let (mut session, notifier) = session_for(&unreachable_base_url().await);
    session.add_to_cart(product("p1", "Check Shirt", 89_000));
    session.set_person_image(Some(photo()));
    let id = ProductId::new("p1");

    let result = session.try_on(&id).await;

    assert!(matches!(
        result,
        Err(ClientError::TryOn(TryOnError::Api(ApiError::Http(_))))
    ));
    assert_eq!(notifier.notices(), [Notice::ServerUnreachable]);
    assert_eq!(session.try_on_status(&id), TryOnStatus::Failed);
}

#[tokio::test]
async fn test_missing_photo_sends_nothing() {
    let server = StubServer::with_sample_catalog().await;
    let (mut session, notifier) = session_for(server.base_url());
    session
        .add_to_cart_by_id(&ProductId::new("p1"))
        .await
        .unwrap();

    let result = session.try_on(&ProductId::new("p1")).await;

    assert!(matches!(
        result,
        Err(ClientError::TryOn(TryOnError::PhotoRequired))
    ));
    assert!(server.try_on_requests().is_empty());
    assert_eq!(notifier.notices(), [Notice::PhotoRequired]);
    assert_eq!(
        session.try_on_status(&ProductId::new("p1")),
        TryOnStatus::Idle
    );
}

#[tokio::test]
async fn test_empty_cart_without_photo_sends_nothing() {
    let server = StubServer::with_sample_catalog().await;
    let (session, notifier) = session_for(server.base_url());
    assert!(session.cart().is_empty());

    let result = session.try_on(&ProductId::new("p1")).await;

    assert!(matches!(
        result,
        Err(ClientError::TryOn(TryOnError::PhotoRequired))
    ));
    assert!(server.try_on_requests().is_empty());
    assert_eq!(notifier.notices(), [Notice::PhotoRequired]);
}

#[tokio::test]
async fn test_earlier_result_survives_later_failure() {
    let server = StubServer::with_sample_catalog().await;
    let (session, _) = ready_session(&server, &["p1"]).await;
    let id = ProductId::new("p1");

    let first = session.try_on(&id).await.unwrap();
    server.set_try_on_reply(TryOnReply::Json(
        StatusCode::OK,
        json!({ "success": false, "error": "queue full" }),
    ));
    session.try_on(&id).await.unwrap_err();

    assert_eq!(session.try_on_status(&id), TryOnStatus::Failed);
    assert_eq!(session.try_on_result(&id), Some(first));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_products_try_on_concurrently() {
    let server = StubServer::with_sample_catalog().await;
    server.set_try_on_delay(Duration::from_millis(300));
    let (session, _) = ready_session(&server, &["p1", "p2", "p3"]).await;
    let ids: Vec<_> = ["p1", "p2", "p3"].into_iter().map(ProductId::new).collect();

    let started = std::time::Instant::now();
    let outcomes = session.try_on_many(&ids).await.unwrap();

    // Sequential requests would take at least 900ms.
    assert!(started.elapsed() < Duration::from_millis(850));
    assert_eq!(outcomes.len(), 3);
    for (outcome, id) in outcomes.iter().zip(&ids) {
        assert_eq!(&outcome.product.id, id);
        assert!(outcome.result.is_ok());
        assert_eq!(session.try_on_status(id), TryOnStatus::Succeeded);
    }
    assert_eq!(server.try_on_requests().len(), 3);
}

#[tokio::test]
async fn test_duplicate_request_while_pending_is_ignored() {
    let server = StubServer::with_sample_catalog().await;
    server.set_try_on_delay(Duration::from_millis(300));
    let (session, notifier) = ready_session(&server, &["p1"]).await;
    let id = ProductId::new("p1");

    let fitting = session.fitting().clone();
    let product = session.cart().get(&id).cloned().unwrap();
    let image = session.cart().person_image().cloned();
    let first = tokio::spawn(async move { fitting.try_on(&product, image.as_ref()).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.try_on_status(&id), TryOnStatus::Pending);

    let second = session.try_on(&id).await;
    assert!(matches!(
        second,
        Err(ClientError::TryOn(TryOnError::AlreadyPending(_)))
    ));

    first.await.unwrap().unwrap();
    assert_eq!(server.try_on_requests().len(), 1);
    assert_eq!(session.try_on_status(&id), TryOnStatus::Succeeded);
    assert!(notifier.notices().is_empty());
}

// =============================================================================
// Gallery promotion
// =============================================================================

#[tokio::test]
async fn test_save_result_adds_gallery_entry() {
    let server = StubServer::with_sample_catalog().await;
    let (mut session, notifier) = ready_session(&server, &["p1"]).await;
    let id = ProductId::new("p1");

    let url = session.try_on(&id).await.unwrap();
    let entry = session.save_result(&id).unwrap();

    assert_eq!(entry.product_id, id);
    assert_eq!(entry.product_name, "Check Shirt");
    assert_eq!(entry.image_url, url);
    assert_eq!(session.gallery().len(), 1);
    assert_eq!(
        notifier.notices(),
        [Notice::SavedToGallery {
            product_name: "Check Shirt".to_string()
        }]
    );
}
