mod helpers;

use axum::http::Method;
use beta_stack_core::UploadResult;
use bytes::Bytes;
use chrono::DateTime;
use helpers::{setup_test_app, setup_test_app_with};

#[tokio::test]
async fn test_stream_upload_writes_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/upload/stream")
        .add_header("X-File-Name", "video.mp4")
        .content_type("video/mp4")
        .bytes(Bytes::from_static(b"hello world!"))
        .await;

    assert_eq!(response.status_code(), 200);

    let result: UploadResult = response.json();
    assert!(result.success);
    assert_eq!(result.size, Some(12));
    assert!(result.error.is_none());

    let file_name = result.file_name.expect("file name on success");
    let (millis, rest) = file_name.split_once('-').expect("timestamp prefix");
    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(rest, "video.mp4");

    let uploaded_at = result.uploaded_at.expect("timestamp on success");
    assert!(uploaded_at.ends_with('Z'));
    assert!(DateTime::parse_from_rfc3339(&uploaded_at).is_ok());

    assert_eq!(app.stored_files(), vec![file_name.clone()]);
    assert_eq!(
        std::fs::read(app.upload_dir().join(&file_name)).unwrap(),
        b"hello world!"
    );
}

#[tokio::test]
async fn test_success_json_has_camel_case_fields_only() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload/stream")
        .add_header("X-File-Name", "notes.txt")
        .content_type("text/plain")
        .bytes(Bytes::from_static(b"abc"))
        .await;

    let json: serde_json::Value = response.json();
    let mut keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["fileName", "size", "success", "uploadedAt"]);
}

#[tokio::test]
async fn test_extension_inferred_from_content_type() {
    let app = setup_test_app().await;

    let result: UploadResult = app
        .client()
        .post("/upload/stream")
        .add_header("X-File-Name", "clip")
        .content_type("video/quicktime")
        .bytes(Bytes::from_static(b"moov"))
        .await
        .json();

    assert!(result.file_name.unwrap().ends_with("-clip.mov"));
}

#[tokio::test]
async fn test_missing_name_and_type_synthesizes_name() {
    let app = setup_test_app().await;

    let result: UploadResult = app
        .client()
        .post("/upload/stream")
        .bytes(Bytes::from_static(b"\x00\x01\x02"))
        .await
        .json();

    assert!(result.success);
    let file_name = result.file_name.unwrap();
    let (_, rest) = file_name.split_once('-').unwrap();
    assert!(rest.starts_with("upload-"), "{}", file_name);
    assert!(!rest.contains('.'), "octet-stream adds no extension: {}", file_name);
}

#[tokio::test]
async fn test_traversal_name_is_confined_to_upload_dir() {
    let app = setup_test_app().await;

    let result: UploadResult = app
        .client()
        .post("/upload/stream")
        .add_header("X-File-Name", "../../etc/passwd")
        .bytes(Bytes::from_static(b"root:x:0:0"))
        .await
        .json();

    assert!(result.success);
    let file_name = result.file_name.unwrap();
    assert!(file_name.ends_with("-passwd"));
    assert_eq!(app.stored_files(), vec![file_name]);
}

#[tokio::test]
async fn test_large_body_is_stored_completely() {
    let app = setup_test_app().await;
    let data: Vec<u8> = (0..1_048_577u32).map(|i| (i % 251) as u8).collect();

    let result: UploadResult = app
        .client()
        .post("/upload/stream")
        .add_header("X-File-Name", "blob.bin")
        .bytes(Bytes::from(data.clone()))
        .await
        .json();

    assert_eq!(result.size, Some(data.len() as u64));
    let stored = std::fs::read(app.upload_dir().join(result.file_name.unwrap())).unwrap();
    assert_eq!(stored, data);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/")
        .add_header("X-Request-ID", "req-42")
        .await;
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app.client().get("/").await;
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_cors_echoes_local_origins_only() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload/stream")
        .add_header("Origin", "http://localhost:5173")
        .bytes(Bytes::from_static(b"x"))
        .await;
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type, X-File-Name");

    let response = app
        .client()
        .post("/upload/stream")
        .add_header("Origin", "https://evil.example")
        .bytes(Bytes::from_static(b"x"))
        .await;
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_cors_prefixes_are_configurable() {
    let app = setup_test_app_with(|config| {
        config.base.cors_origin_prefixes = vec!["https://app.example.com".to_string()];
    })
    .await;

    let response = app
        .client()
        .get("/")
        .add_header("Origin", "https://app.example.com")
        .await;
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );

    let response = app
        .client()
        .get("/")
        .add_header("Origin", "http://localhost:5173")
        .await;
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_options_returns_no_content_on_any_path() {
    let app = setup_test_app().await;

    for path in ["/upload/stream", "/", "/does/not/exist"] {
        let response = app.client().method(Method::OPTIONS, path).await;
        assert_eq!(response.status_code(), 204, "OPTIONS {}", path);
        assert!(response.as_bytes().is_empty());
    }
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_service_info() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), 200);

    let json: serde_json::Value = response.json();
    assert_eq!(json["name"], "beta-stack-api");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>()["status"], "alive");

    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), 200);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["storage"], "healthy");
}

#[tokio::test]
async fn test_readiness_fails_when_upload_dir_disappears() {
    let app = setup_test_app().await;
    std::fs::remove_dir_all(app.upload_dir()).unwrap();

    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), 503);

    let json: serde_json::Value = response.json();
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/nope").await;
    assert_eq!(response.status_code(), 404);

    let json: serde_json::Value = response.json();
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "No route for GET /nope");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);

    let json: serde_json::Value = response.json();
    assert!(json["paths"]["/upload/stream"]["post"].is_object());
    assert!(json["components"]["schemas"]["UploadResult"].is_object());
}

#[tokio::test]
async fn test_upload_after_shutdown_reports_failure() {
    let app = setup_test_app().await;
    app.shutdown.cancel();

    let result: UploadResult = app
        .client()
        .post("/upload/stream")
        .add_header("X-File-Name", "late.bin")
        .bytes(Bytes::from_static(b"too late"))
        .await
        .json();

    assert!(!result.success);
    assert!(result.error.is_some_and(|e| !e.is_empty()));
}
