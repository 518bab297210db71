//! HTTP surface of the extraction service.
//!
//! Thin glue over [`crate::extract::Extractor`]: two extraction endpoints,
//! a docs page, and a health check. The extractor is injected into the
//! router state at construction — handlers share one read-only handle and
//! hold no other state.

pub mod error;
pub mod idcard;
pub mod text;

use crate::extract::Extractor;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub started_at: Instant,
}

/// Build the service router around an injected extractor.
pub fn build_router(extractor: Arc<Extractor>) -> Router {
    // The size limit is enforced by the upload handler so oversized files get
    // a descriptive 400; the framework cap sits well above it and only stops
    // unbounded bodies from buffering.
    let body_cap = extractor.config().max_upload_bytes * 2;

    let state = AppState {
        extractor,
        started_at: Instant::now(),
    };

    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .route("/health", get(health))
        .route("/api/todos/classify", post(text::classify))
        .route("/api/idcard/parse", post(idcard::parse))
        .layer(DefaultBodyLimit::max(body_cap))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / — interactive users land on the docs page.
async fn root() -> Redirect {
    Redirect::permanent("/docs")
}

/// GET /docs — static API documentation.
async fn docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

/// GET /health — liveness and uptime for monitoring.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

const DOCS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Personal Information Parser API</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  code, pre { background: #f4f4f4; border-radius: 4px; padding: 0.1rem 0.3rem; }
  pre { padding: 0.6rem; overflow-x: auto; }
  h2 { border-bottom: 1px solid #ddd; padding-bottom: 0.3rem; }
</style>
</head>
<body>
<h1>Personal Information Parser API</h1>
<p>AI-powered extraction of structured personal information from unstructured
text and ID-document images.</p>

<h2>POST /api/todos/classify</h2>
<p>Parse free text into structured personal-information fields.</p>
<pre>{ "input_text": "my name is Lewis Hamilton, I live in 2944 Monaco dr, ..." }</pre>
<p>Returns <code>{ original_input, parsed_data, confidence }</code> where
<code>parsed_data</code> carries name, street, city, state, country, zip_code,
phone_number, email, and confidence (0.0&ndash;1.0).</p>

<h2>POST /api/idcard/parse</h2>
<p>Multipart upload (field <code>file</code>) of an ID card, driver's licence,
or passport image. Supported formats: JPEG, PNG, WebP. Maximum size: 10 MiB.</p>
<p>Returns <code>{ filename, parsed_data, confidence }</code> with names,
dates, document numbers, physical characteristics, document type, and issuing
authority.</p>

<h2>Errors</h2>
<p><code>400</code> for non-image uploads, oversized files, or empty input;
<code>500</code> with an <code>error</code> field for configuration faults.
When the model itself fails, the endpoints answer <code>200</code> with an
all-null record, <code>confidence: 0.0</code>, and an <code>error</code>
message.</p>

<h2>GET /health</h2>
<p>Service liveness, version, and uptime.</p>
</body>
</html>
"#;
