//! HTTP server for the campaign generator.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                                   |
//! |--------|-------------------|-----------------------------------------------|
//! | GET    | `/`               | Upload form                                   |
//! | GET    | `/health`         | Health check                                  |
//! | POST   | `/api/validate`   | Validate a CSV, JSON list of problems         |
//! | POST   | `/api/campaigns`  | CSV in, `campaign.xlsx` or `error_report.csv` out |
//! | GET    | `/api/logs`       | SSE stream for real-time logs                 |
//!
//! Uploads are `multipart/form-data` with a `file` field; `/api/campaigns`
//! also reads an optional `crossNegation` field (yes/no, default yes).

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_success, log_warning, LOG_BROADCASTER};
use super::types::{content_disposition, error_response, new_job_id, ValidationResponse};
use crate::config::{
    parse_yes_no, ServerConfig, CAMPAIGN_FILE_NAME, CSV_MIME, ERROR_REPORT_FILE_NAME, XLSX_MIME,
};
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::export::{errors_to_csv, records_to_xlsx};
use crate::transform::pipeline::{generate_from_bytes, validate_bytes, GenerateOptions, Outcome};

const INDEX_HTML: &str = include_str!("../../static/index.html");

type ApiError = (StatusCode, Json<Value>);

/// A decoded multipart upload.
struct Upload {
    file_name: Option<String>,
    bytes: Vec<u8>,
    cross_negation: Option<bool>,
}

/// Build the application router.
pub fn build_router(config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/validate", post(validate_upload))
        .route("/api/campaigns", post(generate_campaigns))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 Campgen server running on http://localhost:{}", config.port);
    println!("   GET  /              - Upload form");
    println!("   POST /api/validate  - Validate CSV file");
    println!("   POST /api/campaigns - Generate bulk upload file");
    println!("   GET  /api/logs      - SSE log stream");
    println!("   GET  /health        - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "campgen",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "validate": "POST /api/validate",
            "campaigns": "POST /api/campaigns",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip the entries they missed.
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Validate an uploaded CSV without generating anything.
async fn validate_upload(multipart: Multipart) -> Result<Json<ValidationResponse>, ApiError> {
    let upload = read_upload(multipart).await.map_err(reject)?;
    let job_id = new_job_id();
    announce(&job_id, &upload);

    let (csv_info, errors) = validate_bytes(&upload.bytes)
        .map_err(ServerError::from)
        .map_err(reject)?;

    Ok(Json(ValidationResponse::new(job_id, csv_info, errors)))
}

/// Validate then expand an uploaded CSV.
///
/// 200 with the workbook on success, 422 with the error report otherwise.
async fn generate_campaigns(multipart: Multipart) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await.map_err(reject)?;
    let job_id = new_job_id();
    announce(&job_id, &upload);

    let options = GenerateOptions {
        cross_negation: upload.cross_negation.unwrap_or(true),
    };

    let result = generate_from_bytes(&upload.bytes, options)
        .map_err(ServerError::from)
        .map_err(reject)?;

    match result.outcome {
        Outcome::Generated { records } => {
            let bytes = records_to_xlsx(&records)
                .map_err(|e| reject(PipelineError::from(e).into()))?;
            log_success(format!(
                "[{}] {} ready ({} records)",
                job_id,
                CAMPAIGN_FILE_NAME,
                records.len()
            ));
            Ok(attachment(StatusCode::OK, XLSX_MIME, CAMPAIGN_FILE_NAME, bytes))
        }
        Outcome::Invalid { errors } => {
            let bytes = errors_to_csv(&errors)
                .map_err(|e| reject(PipelineError::from(e).into()))?;
            log_warning(format!(
                "[{}] {} problems, sending {}",
                job_id,
                errors.len(),
                ERROR_REPORT_FILE_NAME
            ));
            Ok(attachment(
                StatusCode::UNPROCESSABLE_ENTITY,
                CSV_MIME,
                ERROR_REPORT_FILE_NAME,
                bytes,
            ))
        }
    }
}

async fn read_upload(mut multipart: Multipart) -> ServerResult<Upload> {
    let mut file_name = None;
    let mut bytes = None;
    let mut cross_negation = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                bytes = Some(data.to_vec());
            }
            "crossNegation" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                cross_negation = Some(parse_yes_no(&text).ok_or_else(|| {
                    ServerError::BadRequest(format!("Invalid crossNegation value '{}'", text))
                })?);
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

    Ok(Upload {
        file_name,
        bytes,
        cross_negation,
    })
}

fn announce(job_id: &str, upload: &Upload) {
    log_info(format!(
        "📄 [{}] upload {} ({} bytes)",
        job_id,
        upload.file_name.as_deref().unwrap_or("unknown"),
        upload.bytes.len()
    ));
}

fn attachment(status: StatusCode, mime: &str, file_name: &str, body: Vec<u8>) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(file_name)),
        ],
        body,
    )
        .into_response()
}

fn status_for(err: &ServerError) -> StatusCode {
    match err {
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(PipelineError::Export(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ServerError::Pipeline(_) => StatusCode::BAD_REQUEST,
    }
}

fn reject(err: ServerError) -> ApiError {
    log_error(err.to_string());
    (status_for(&err), Json(error_response(&err.to_string())))
}
