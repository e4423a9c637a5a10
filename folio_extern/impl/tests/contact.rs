use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{extract::State, http::StatusCode, routing, Json, Router};
use folio_extern_contracts::contact::{ContactApiRequest, ContactApiService, ContactApiSubmitError};
use folio_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use folio_utils::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

type Received = Arc<Mutex<Vec<Value>>>;

#[tokio::test]
async fn ok() {
    // Arrange
    let (addr, received) = serve(StatusCode::OK, json!({"success": true})).await;
    let sut = make_sut(addr);

    // Act
    let result = sut.submit(&request()).await;

    // Assert
    result.unwrap();
    assert_eq!(
        *received.lock().await,
        [json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello, I would like to connect.",
        })]
    );
}

#[tokio::test]
async fn rejected() {
    // Arrange
    let (addr, _) = serve(
        StatusCode::BAD_REQUEST,
        json!({"error": "Missing required fields"}),
    )
    .await;
    let sut = make_sut(addr);

    // Act
    let result = sut.submit(&request()).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactApiSubmitError::Rejected { status: 400, message: Some(message) })
            if message == "Missing required fields"
    );
}

#[tokio::test]
async fn rejected_without_error_body() {
    // Arrange
    let (addr, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, json!("oops")).await;
    let sut = make_sut(addr);

    // Act
    let result = sut.submit(&request()).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactApiSubmitError::Rejected {
            status: 500,
            message: None
        })
    );
}

#[tokio::test]
async fn unreachable() {
    // Arrange
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let sut = make_sut(addr);

    // Act
    let result = sut.submit(&request()).await;

    // Assert
    assert_matches!(result, Err(ContactApiSubmitError::Other(_)));
}

#[test]
fn endpoint() {
    let config = ContactApiServiceConfig::new(
        &"https://example.com/".parse().unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();
    assert_eq!(config.endpoint().as_str(), "https://example.com/api/contact");
}

fn request() -> ContactApiRequest {
    ContactApiRequest {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        message: "Hello, I would like to connect.".into(),
        website: None,
    }
}

fn make_sut(addr: SocketAddr) -> ContactApiServiceImpl {
    let base_url = format!("http://{addr}/").parse().unwrap();
    let config = ContactApiServiceConfig::new(&base_url, Duration::from_secs(5)).unwrap();
    ContactApiServiceImpl::new(config).unwrap()
}

async fn serve(status: StatusCode, response: Value) -> (SocketAddr, Received) {
    let received = Received::default();
    let router = Router::new()
        .route(
            "/api/contact",
            routing::post(
                move |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().await.push(body);
                    (status, Json(response))
                },
            ),
        )
        .with_state(Arc::clone(&received));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    (addr, received)
}
