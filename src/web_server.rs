use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    serve, Form, Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::templates;

const HOME_PAGE: &str = "<h2>AI Form Generator</h2><p>Use terminal to request forms.</p>";

// Internal failures (template render, encoding) become plain 500s; extractor
// rejections keep their own status codes.
struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "Request handler failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal Server Error: {}", self.0),
        )
            .into_response()
    }
}

/// Build the application router. Split out from [`start_web_server`] so tests
/// can drive it without binding a socket.
pub fn build_router(forms_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/submit", post(submit_handler))
        // Generated pages are served straight from disk; a missing file is
        // ServeDir's own 404.
        .nest_service("/forms", ServeDir::new(forms_dir))
        .layer(TraceLayer::new_for_http())
}

async fn home_handler() -> Html<&'static str> {
    Html(HOME_PAGE)
}

// Collects posted fields and uploaded file names (file content is ignored)
// and echoes them back as an indented-JSON confirmation page. Submissions are
// not persisted; the form-log store exists but stays unwritten for now.
async fn submit_handler(request: Request) -> Response {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let mut received = serde_json::Map::new();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = match Multipart::from_request(request, &()).await {
            Ok(multipart) => multipart,
            Err(rejection) => return rejection.into_response(),
        };
        loop {
            match multipart.next_field().await {
                Ok(Some(field)) => {
                    let Some(name) = field.name().map(str::to_owned) else {
                        continue;
                    };
                    match field.file_name().map(str::to_owned) {
                        Some(file_name) if !file_name.is_empty() => {
                            received.insert(name, file_name.into());
                        }
                        Some(_) => {} // empty file input, as browsers send them
                        None => match field.text().await {
                            Ok(value) => {
                                received.insert(name, value.into());
                            }
                            Err(err) => {
                                return (StatusCode::BAD_REQUEST, err.to_string()).into_response()
                            }
                        },
                    }
                }
                Ok(None) => break,
                Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            }
        }
    } else {
        let Form(fields) = match Form::<Vec<(String, String)>>::from_request(request, &()).await {
            Ok(form) => form,
            Err(rejection) => return rejection.into_response(),
        };
        for (name, value) in fields {
            received.insert(name, value.into());
        }
    }

    match render_receipt(&received) {
        Ok(page) => Html(page).into_response(),
        Err(e) => ServerError(e).into_response(),
    }
}

fn render_receipt(received: &serde_json::Map<String, serde_json::Value>) -> Result<String> {
    let data_json =
        serde_json::to_string_pretty(received).context("Failed to encode submitted fields")?;
    templates::render_submission_receipt(&data_json)
}

/// Bind and run the HTTP surface until the task is aborted.
pub async fn start_web_server(port: u16, forms_dir: PathBuf) -> Result<()> {
    let app = build_router(forms_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    info!("Web server listening on http://{}", addr);

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_home_serves_info_text() {
        let dir = TempDir::new().unwrap();
        let app = build_router(dir.path().to_path_buf());

        let response = app
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("AI Form Generator"));
    }

    #[tokio::test]
    async fn test_missing_form_is_not_found() {
        let dir = TempDir::new().unwrap();
        let app = build_router(dir.path().to_path_buf());

        let response = app
            .oneshot(
                HttpRequest::get("/forms/nope.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_existing_form_is_served() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("form_cafe0123.html"), "<form>hi</form>").unwrap();
        let app = build_router(dir.path().to_path_buf());

        let response = app
            .oneshot(
                HttpRequest::get("/forms/form_cafe0123.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<form>hi</form>");
    }
}
