//! HTTP server for DropSend.
//!
//! # API Endpoints
//!
//! | Method | Path         | Description                               |
//! |--------|--------------|-------------------------------------------|
//! | GET    | `/health`    | Health check                              |
//! | POST   | `/send`      | Upload one file (multipart or raw body)   |
//! | GET    | `/api/logs`  | SSE stream for real-time logs             |
//! | GET    | `/*`         | Static widget assets                      |

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use futures::TryStreamExt;
use http_body_util::LengthLimitError;
use serde_json::{json, Value};
use std::{convert::Infallible, error::Error as StdError, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir};
use uuid::Uuid;

use super::logs::{log_error, log_info, log_warning, LOG_BROADCASTER};
use super::types::SendResponse;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult, StoreError};
use crate::progress::ProgressReporter;
use crate::storage::{FileStore, StoredFile};

/// Header carrying the file name for raw-body uploads.
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Multipart field holding the file.
pub const FILE_FIELD: &str = "file";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
}

/// Build the application router for `config`.
pub fn router(config: &ServerConfig) -> Router {
    let state = AppState {
        store: Arc::new(FileStore::new(
            &config.upload_dir,
            ProgressReporter::new(config.show_progress),
        )),
    };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(FILE_NAME_HEADER),
        ])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route(
            "/send",
            post(send_file)
                .layer::<_, Infallible>(RequestBodyLimitLayer::new(config.max_upload_bytes)),
        )
        .route("/api/logs", get(sse_logs))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state)
        // The cap comes from RequestBodyLimitLayer above
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(config.listen).await?;

    println!("🚀 DropSend server running on http://{}", config.listen);
    println!("   POST /send      - Upload a file");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");
    println!("📁 Saving files to {}", config.upload_dir.display());
    println!("🌐 Serving widget from {}", config.static_dir.display());
    println!();

    if !config.has_widget() {
        log_warning(format!(
            "No index.html in {}, GET / will return 404 (build the widget with trunk or pass --static-dir)",
            config.static_dir.display()
        ));
    }

    serve(listener, &config).await?;
    Ok(())
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, config: &ServerConfig) -> std::io::Result<()> {
    axum::serve(listener, router(config)).await
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "dropsend",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "send": "POST /send",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged subscriber, skip
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Receive one file.
///
/// Multipart bodies are read from the `file` field; anything else is
/// treated as the raw file content named by `X-File-Name`.
async fn send_file(State(state): State<AppState>, request: Request) -> ServerResult<Json<SendResponse>> {
    let upload_id = Uuid::new_v4();
    let header_name = header_file_name(request.headers());

    let result = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        receive_multipart(&state, multipart, header_name, upload_id).await
    } else {
        let length = content_length(request.headers());
        match header_name {
            Some(name) => {
                log_info(format!("Receiving {} [{}]", name, upload_id));
                let body = request.into_body().into_data_stream().map_err(body_error);
                state
                    .store
                    .store(&name, length, body)
                    .await
                    .map_err(ServerError::from)
            }
            None => Err(StoreError::MissingFileName.into()),
        }
    };

    match result {
        Ok(stored) => Ok(Json(SendResponse::new(upload_id, &stored))),
        Err(e) => {
            log_error(format!("[{}] {}", upload_id, e));
            Err(e)
        }
    }
}

async fn receive_multipart(
    state: &AppState,
    mut multipart: Multipart,
    header_name: Option<String>,
    upload_id: Uuid,
) -> ServerResult<StoredFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| match multipart_error(e) {
            StoreError::TooLarge => ServerError::Store(StoreError::TooLarge),
            other => ServerError::BadRequest(format!("Multipart error: {}", other)),
        })?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .or_else(|| header_name.clone())
            .ok_or(StoreError::MissingFileName)?;

        log_info(format!("Receiving {} [{}]", name, upload_id));
        // Part sizes are not announced, so progress runs without a total.
        let stored = state.store.store(&name, None, field.map_err(multipart_error)).await?;
        return Ok(stored);
    }

    Err(ServerError::BadRequest("No file provided".to_string()))
}

/// Classify a raw body error. Hitting the body limit becomes `TooLarge`.
fn body_error(err: axum::Error) -> StoreError {
    if is_length_limit(&err) {
        StoreError::TooLarge
    } else {
        StoreError::Body(err.to_string())
    }
}

fn multipart_error(err: MultipartError) -> StoreError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StoreError::TooLarge
    } else {
        StoreError::Body(err.body_text())
    }
}

fn is_length_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

fn header_file_name(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_file_name_ignores_blank() {
        let mut headers = HeaderMap::new();
        assert_eq!(header_file_name(&headers), None);

        headers.insert(FILE_NAME_HEADER, HeaderValue::from_static("   "));
        assert_eq!(header_file_name(&headers), None);

        headers.insert(FILE_NAME_HEADER, HeaderValue::from_static("b.txt"));
        assert_eq!(header_file_name(&headers).as_deref(), Some("b.txt"));
    }

    #[test]
    fn test_multipart_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=xyz"),
        );
        assert!(is_multipart(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        assert!(!is_multipart(&headers));
    }

    #[test]
    fn test_other_body_errors_stay_bad_request() {
        let err = body_error(axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        )));
        assert!(matches!(err, StoreError::Body(msg) if msg.contains("reset")));
    }

    #[test]
    fn test_content_length_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(content_length(&headers), Some(42));
    }
}
