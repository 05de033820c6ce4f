use std::fs;
use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use itinerary_pdf::{ItineraryResponse, RenderOptions};
use itinerary_server::http::{router, AppState};
use serde_json::Value;
use tower::ServiceExt;

const BODY: &str = r#"{
    "name": "Jane Doe",
    "greeting_name": "Jane",
    "departure_from": "Delhi",
    "destination": "Dubai",
    "num_travellers": 2,
    "start_date": "2025-05-01",
    "end_date": "2025-05-03",
    "duration_nights": 2,
    "duration_days": 3,
    "activities": {
        "2025-05-01": ["Morning - Arrive", "Evening - Dhow cruise"],
        "2025-05-02": ["Afternoon - Burj Khalifa"]
    },
    "transfers": {"2025-05-01": "Airport to hotel"},
    "payment_plan": {"total_amount": "INR 1,00,000", "tcs": "Not Collected", "installments": []},
    "contact": {"company_name": "Vigovia", "address": "Bengaluru", "phone": "1", "email": "a@b.c"}
}"#;

fn app(output_dir: &Path) -> Router {
    let options = RenderOptions {
        output_dir: output_dir.to_path_buf(),
        logo_path: output_dir.join("missing-logo.png"),
        ..RenderOptions::default()
    };
    router(AppState::new(options, "http://localhost:8080"))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate-itinerary")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().expect("temp dir");
    let response = app(dir.path()).oneshot(get("/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn malformed_json_is_invalid_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let response = app(dir.path())
        .oneshot(post_json("{\"name\": "))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, serde_json::json!({"error": "Invalid input"}));
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 0);
}

#[tokio::test]
async fn mistyped_field_is_invalid_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let response = app(dir.path())
        .oneshot(post_json(r#"{"num_travellers": "two"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid input");
}

#[tokio::test]
async fn null_values_and_repeated_keys_are_accepted() {
    for body in ["null", r#"{"name": null, "activities": null}"#, r#"{"name": "A", "name": "B"}"#] {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = app(dir.path())
            .oneshot(post_json(body))
            .await
            .expect("response");
        assert_ne!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn unwritable_output_directory_is_generation_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").expect("write blocker");

    let response = app(&blocker.join("pdfs"))
        .oneshot(post_json(BODY))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"error": "Failed to generate PDF"})
    );
}

#[tokio::test]
async fn serves_files_from_output_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("itinerary_A_B.pdf"), b"%PDF-1.3 test").expect("write pdf");

    let response = app(dir.path())
        .oneshot(get("/pdfs/itinerary_A_B.pdf"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("content type"),
        "application/pdf"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&bytes[..], b"%PDF-1.3 test");
}

#[tokio::test]
async fn missing_and_escaping_files_are_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = app(dir.path());

    for uri in ["/pdfs/missing.pdf", "/pdfs/..", "/pdfs/..%2Fsecret.pdf"] {
        let response = app.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn generates_and_links_the_document() {
    if !itinerary_pdf::fonts::fonts_available() {
        eprintln!("Skipping generation assertions: no font family available");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(post_json(BODY))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: ItineraryResponse = serde_json::from_slice(&bytes).expect("response json");
    assert_eq!(body.message, "Itinerary generated successfully");
    assert_eq!(
        body.file_path,
        "http://localhost:8080/pdfs/itinerary_Jane_Doe_2025-05-01.pdf"
    );
    let written = fs::read(dir.path().join("itinerary_Jane_Doe_2025-05-01.pdf")).expect("pdf");
    assert!(written.starts_with(b"%PDF"));

    let download = app
        .oneshot(get("/pdfs/itinerary_Jane_Doe_2025-05-01.pdf"))
        .await
        .expect("response");
    assert_eq!(download.status(), StatusCode::OK);
}
