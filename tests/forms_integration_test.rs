use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use multisite::adapters::{LocalContentStore, MemoryRateLimitStore, ResendClient};
use multisite::{build_app, AppState, SiteConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(content: &TempDir, email_endpoint: String, api_key: Option<&str>) -> Router {
    let mut config = SiteConfig::default();
    config.content.root = content.path().to_string_lossy().to_string();

    let email = ResendClient::new(
        email_endpoint,
        api_key.map(str::to_string),
        reqwest::Client::new(),
    );
    build_app(AppState::new(
        config,
        Arc::new(LocalContentStore::new(content.path())),
        Arc::new(MemoryRateLimitStore::new()),
        Arc::new(email),
    ))
}

async fn send(app: &Router, host: &str, path: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::HOST, host)
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn contact(email: &str) -> String {
    json!({"name": "Jane", "email": email, "message": "Hello there"}).to_string()
}

fn website_request() -> Value {
    json!({
        "name": "Jo",
        "email": "jo@example.com",
        "pages": "3 pages",
        "seoLevel": "advanced",
        "deliveryTime": "standard",
        "theme": "modern",
        "supportLevel": "basic",
        "features": {"imageGallery": true, "blog": false}
    })
}

#[tokio::test]
async fn contact_from_tenant_site_is_labelled_and_sent() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/emails")
            .header("authorization", "Bearer re_test")
            .json_body_partial(
                r#"{"to": ["hello@sitesbystephens.com"], "reply_to": "jane@example.com", "subject": "[acme] New Contact Form Submission from Jane"}"#,
            );
        then.status(200).json_body(json!({"id": "email_1"}));
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let (status, body) = send(&app, "acme.sitesbystephens.com", "/api/contact", &contact("jane@example.com")).await;

    mock.assert();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Message sent successfully"}));
}

#[tokio::test]
async fn contact_from_main_site_uses_main_label() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/emails")
            .json_body_partial(r#"{"subject": "[Main Site] New Contact Form Submission from Jane"}"#);
        then.status(200).json_body(json!({"id": "email_2"}));
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let (status, _) = send(&app, "sitesbystephens.com", "/api/contact", &contact("jane@example.com")).await;

    mock.assert();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn contact_validation_errors_are_400() {
    let content = TempDir::new().unwrap();
    let app = app(&content, "http://127.0.0.1:9/emails".to_string(), Some("re_test"));

    let (status, body) = send(&app, "sitesbystephens.com", "/api/contact", r#"{"name": "Jane"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields. Please fill in name, email, and message."
    );

    let (status, body) = send(&app, "sitesbystephens.com", "/api/contact", &contact("not-an-email")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");

    let (status, body) = send(&app, "sitesbystephens.com", "/api/contact", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn sixth_contact_in_an_hour_is_rate_limited() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/emails");
        then.status(200).json_body(json!({"id": "email_3"}));
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    for _ in 0..5 {
        let (status, _) = send(&app, "sitesbystephens.com", "/api/contact", &contact("jane@example.com")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app, "sitesbystephens.com", "/api/contact", &contact("JANE@example.com")).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].is_string());
    mock.assert_hits(5);
}

#[tokio::test]
async fn missing_api_key_is_500() {
    let content = TempDir::new().unwrap();
    let app = app(&content, "http://127.0.0.1:9/emails".to_string(), None);

    let (status, body) = send(&app, "sitesbystephens.com", "/api/contact", &contact("jane@example.com")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Email service not configured");
}

#[tokio::test]
async fn provider_failure_is_500_without_details() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/emails");
        then.status(401).body("invalid api key re_test");
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let (status, body) = send(&app, "sitesbystephens.com", "/api/contact", &contact("jane@example.com")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send email. Please try again later.");
}

#[tokio::test]
async fn website_request_computes_missing_estimate() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/emails")
            .json_body_partial(r#"{"to": ["contact@sitesbystephens.com"], "subject": "New Website Request from Jo"}"#)
            .body_contains("Image Gallery")
            .body_contains("$230");
        then.status(200).json_body(json!({"id": "email_4"}));
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let (status, body) = send(&app, "sitesbystephens.com", "/api/request", &website_request().to_string()).await;

    mock.assert();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Request submitted successfully"}));
}

#[tokio::test]
async fn website_request_with_huge_page_count_is_not_priced() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/emails")
            .body_contains("Estimated Price: Not calculated");
        then.status(200).json_body(json!({"id": "email_5"}));
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let mut request = website_request();
    request["pages"] = json!("99999999 pages");
    let (status, body) = send(&app, "sitesbystephens.com", "/api/request", &request.to_string()).await;

    mock.assert();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn numeric_optional_fields_are_accepted() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/emails").body_contains("5551234");
        then.status(200).json_body(json!({"id": "email_6"}));
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let body = json!({"name": "Jane", "email": "jane@example.com", "message": "Hi", "phone": 5551234});
    let (status, _) = send(&app, "sitesbystephens.com", "/api/contact", &body.to_string()).await;

    mock.assert();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn website_request_limits_and_failures() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/emails");
        then.status(500).body("provider down");
    });
    let app = app(&content, server.url("/emails"), Some("re_test"));

    let mut missing = website_request();
    missing.as_object_mut().unwrap().remove("theme");
    let (status, body) = send(&app, "sitesbystephens.com", "/api/request", &missing.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");

    for _ in 0..3 {
        let (status, body) = send(&app, "sitesbystephens.com", "/api/request", &website_request().to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to send email notification");
    }
    let (status, _) = send(&app, "sitesbystephens.com", "/api/request", &website_request().to_string()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_email_endpoint_reports_id_or_error() {
    let content = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/emails")
            .json_body_partial(r#"{"subject": "Test Email from Your Website"}"#);
        then.status(200).json_body(json!({"id": "email_5"}));
    });

    let app = app(&content, server.url("/emails"), Some("re_test"));
    let response = app
        .oneshot(Request::builder().uri("/api/test-email").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["emailId"], "email_5");

    let unconfigured = self::app(&content, server.url("/emails"), None);
    let response = unconfigured
        .oneshot(Request::builder().uri("/api/test-email").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
