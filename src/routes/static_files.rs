//! Static File Serving
//!
//! Serves the dashboard from the `static/` directory when it exists,
//! otherwise an embedded page listing the API endpoints.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;

pub fn router() -> Router {
    let serve_dir = ServeDir::new("static").append_index_html_on_directories(true);

    Router::new()
        .route("/", get(serve_index))
        .fallback_service(serve_dir)
}

async fn serve_index() -> Response {
    let index = PathBuf::from("static/index.html");
    if let Ok(content) = tokio::fs::read_to_string(&index).await {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response();
    }

    let fallback_html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Docflow - Document Pipeline</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 760px;
            margin: 0 auto;
            padding: 40px 20px;
            color: #222;
        }
        h1 { margin-bottom: 4px; }
        h2 { color: #666; font-weight: 400; font-size: 1.1em; }
        code {
            background: #f0f0f0;
            padding: 2px 8px;
            border-radius: 4px;
        }
        li { margin: 8px 0; }
    </style>
</head>
<body>
    <h1>Docflow</h1>
    <h2>Document intent classification pipeline</h2>

    <p>The server is running. Dashboard assets are not deployed; the API is
    available directly:</p>

    <ul>
        <li><code>POST /classify</code> - upload a document (multipart field <code>file</code>)</li>
        <li><code>GET /api/documents</code> - paginated document listing</li>
        <li><code>GET /api/documents/{id}</code> - document details</li>
        <li><code>GET /api/stats</code> - processing statistics</li>
        <li><code>GET /agent/data</code> - agent response dashboard rows</li>
        <li><code>GET /api/health</code> - health check</li>
    </ul>

    <p>Example upload:</p>
    <p><code>curl -F "file=@invoice.pdf" http://localhost:8000/classify</code></p>
</body>
</html>"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        fallback_html.to_string(),
    )
        .into_response()
}
