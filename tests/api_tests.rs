//! HTTP API tests
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`.
//! Schemas are served by a throwaway axum server bound to 127.0.0.1:0 so the
//! fetch path runs against a real socket without leaving the machine.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use xsd_docs::limits::Limits;
use xsd_docs::loaders::{FetchConfig, Loader};
use xsd_docs::server::{create_router, AppState, CONVERT_PATH, MISSING_URL_MESSAGE};

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(path).expect("Failed to read fixture")
}

/// Stream a fixture in small chunks with no Content-Length header
fn chunked_fixture(name: &str) -> Body {
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = fixture(name)
        .into_bytes()
        .chunks(64)
        .map(|chunk| Ok(chunk.to_vec()))
        .collect();
    Body::from_stream(futures_util::stream::iter(chunks))
}

async fn spawn_schema_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/purchase_order.xsd",
            get(|| async { fixture("purchase_order.xsd") }),
        )
        .route("/malformed.xsd", get(|| async { fixture("malformed.xsd") }))
        .route("/chunked.xsd", get(|| async { chunked_fixture("purchase_order.xsd") }))
        .route(
            "/slow.xsd",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                fixture("purchase_order.xsd")
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn app_with(config: FetchConfig) -> Router {
    create_router(AppState::new(Loader::new(&config).unwrap()))
}

fn app() -> Router {
    app_with(FetchConfig::default())
}

fn convert_request(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(CONVERT_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn url_body(url: &str) -> String {
    serde_json::json!({ "xmlDataUrl": url }).to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Validation (400)
// ============================================================================

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    for body in [
        r#"{}"#,
        r#"{"xmlDataUrl": null}"#,
        r#"{"xmlDataUrl": ""}"#,
        r#"{"xmlDataUrl": "   "}"#,
    ] {
        let response = app().oneshot(convert_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(body_text(response).await, MISSING_URL_MESSAGE);
    }
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let response = app().oneshot(convert_request("not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Success (200)
// ============================================================================

#[tokio::test]
async fn test_convert_fetched_schema() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/purchase_order.xsd", addr);

    let response = app().oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let simple_names: Vec<_> = json["simpleTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(simple_names, vec!["SKU", "StateCode"]);

    let complex_names: Vec<_> = json["complexTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(complex_names, vec!["PurchaseOrderType", "USAddress"]);
    assert_eq!(
        json["complexTypes"][1]["attributes"][0],
        serde_json::json!({"name": "zip", "description": "Postal code"})
    );
}

#[tokio::test]
async fn test_pascal_case_request_field() {
    let addr = spawn_schema_server().await;
    let body = serde_json::json!({
        "XmlDataUrl": format!("http://{}/purchase_order.xsd", addr)
    })
    .to_string();

    let response = app().oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Failures (500)
// ============================================================================

#[tokio::test]
async fn test_chunked_schema_is_assembled() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/chunked.xsd", addr);

    let response = app().oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["complexTypes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_oversized_chunked_schema_is_server_error() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/chunked.xsd", addr);
    let limits = Limits::default().with_max_xml_size(256);
    let app = app_with(FetchConfig::default().with_limits(limits));

    let response = app.oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = body_text(response).await;
    assert!(text.starts_with("limit exceeded: "), "got: {}", text);
}

#[tokio::test]
async fn test_oversized_schema_with_content_length_is_server_error() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/purchase_order.xsd", addr);
    let limits = Limits::default().with_max_xml_size(256);
    let app = app_with(FetchConfig::default().with_limits(limits));

    let response = app.oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = body_text(response).await;
    assert!(text.starts_with("limit exceeded: "), "got: {}", text);
}

#[tokio::test]
async fn test_malformed_schema_is_server_error() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/malformed.xsd", addr);

    let response = app().oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.starts_with("parse error: "));
}

#[tokio::test]
async fn test_not_found_is_server_error() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/missing.xsd", addr);

    let response = app().oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = body_text(response).await;
    assert!(text.starts_with("fetch error: "), "got: {}", text);
    assert!(text.contains("404"), "got: {}", text);
}

#[tokio::test]
async fn test_unreachable_host_is_server_error() {
    // Bind and drop a listener to get a port nothing is listening on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let url = format!("http://{}/schema.xsd", addr);

    let response = app().oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unsupported_scheme_is_server_error() {
    let response = app()
        .oneshot(convert_request(url_body("ftp://example.com/schema.xsd")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("ftp"));
}

#[tokio::test]
async fn test_fetch_timeout_is_server_error() {
    let addr = spawn_schema_server().await;
    let url = format!("http://{}/slow.xsd", addr);
    let app = app_with(FetchConfig::default().with_timeout(Duration::from_millis(500)));

    let response = app.oneshot(convert_request(url_body(&url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.starts_with("fetch error: "));
}

// ============================================================================
// Routing and CORS
// ============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .method(Method::POST)
        .uri(CONVERT_PATH)
        .header(header::ORIGIN, "https://ui.example.org")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(CONVERT_PATH)
        .header(header::ORIGIN, "https://ui.example.org")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_only_post_is_routed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri(CONVERT_PATH)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/other")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
