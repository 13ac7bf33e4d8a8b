use std::fs;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use tempfile::TempDir;

use formbot::web_server::build_router;

fn server_over(dir: &TempDir) -> TestServer {
    TestServer::new(build_router(dir.path().to_path_buf())).unwrap()
}

#[tokio::test]
async fn test_home_page_names_the_app() {
    let dir = TempDir::new().unwrap();
    let server = server_over(&dir);

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.contains("AI Form Generator"));
    assert!(text.contains("Use terminal to request forms."));
}

#[tokio::test]
async fn test_generated_form_is_served_from_disk() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("form_ab12cd34.html"),
        "<html><form>leave form</form></html>",
    )
    .unwrap();
    let server = server_over(&dir);

    let response = server.get("/forms/form_ab12cd34.html").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "<html><form>leave form</form></html>");
}

#[tokio::test]
async fn test_unknown_form_is_not_found() {
    let dir = TempDir::new().unwrap();
    let server = server_over(&dir);

    let response = server.get("/forms/form_missing.html").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_urlencoded_submission_echoes_fields() {
    let dir = TempDir::new().unwrap();
    let server = server_over(&dir);

    let response = server
        .post("/submit")
        .form(&[("full_name", "Ada Lovelace"), ("reason", "annual leave")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.contains("Form Submitted Successfully!"));
    assert!(text.contains("Data Received:"));
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("annual leave"));
}

#[tokio::test]
async fn test_empty_submission_still_confirms() {
    let dir = TempDir::new().unwrap();
    let server = server_over(&dir);

    let response = server
        .post("/submit")
        .form(&Vec::<(String, String)>::new())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.contains("Form Submitted Successfully!"));
    assert!(text.contains("{}"));
}

#[tokio::test]
async fn test_multipart_submission_keeps_file_names_not_content() {
    let dir = TempDir::new().unwrap();
    let server = server_over(&dir);

    // Hand-rolled body: a text field, a real upload, and an empty file input
    // like browsers send for an untouched <input type="file">.
    let boundary = "formbot-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"full_name\"\r\n\r\n\
         Ada Lovelace\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"attachment\"; filename=\"notes.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         secret file content\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"optional_upload\"; filename=\"\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         \r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = server
        .post("/submit")
        .content_type(&format!("multipart/form-data; boundary={}", boundary))
        .bytes(Bytes::from(body))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.contains("Form Submitted Successfully!"));
    assert!(text.contains("Ada Lovelace"));
    // Uploads are reported by name only.
    assert!(text.contains("notes.txt"));
    assert!(!text.contains("secret file content"));
    // Untouched file inputs are dropped entirely.
    assert!(!text.contains("optional_upload"));
}
