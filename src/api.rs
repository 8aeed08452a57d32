use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::container::schema::MIME_TYPE;
use crate::converter::{output_file_name, RplConverter};

#[derive(Clone)]
pub struct AppState {
    pub converter: RplConverter,
    /// Parent of the per-request working directories
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Multipart form accepted by the convert endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ConvertUpload {
    /// Route position list workbook (.xlsx)
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Error returned to the client as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, convert_rpl),
    components(schemas(HealthResponse, ErrorResponse, ConvertUpload)),
    tags((name = "rpl-converter", description = "Route position list to HDF5 conversion"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/convert", post(convert_rpl))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    // The browser frontend is served from another origin
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(CorsLayer::permissive())
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "rpl-converter",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

struct Upload {
    file_name: String,
    bytes: Bytes,
}

#[utoipa::path(
    post,
    path = "/api/v1/convert",
    tag = "rpl-converter",
    request_body(content = ConvertUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "HDF5 container as an attachment", content_type = "application/x-hdf5"),
        (status = 400, description = "No file or not an .xlsx file", body = ErrorResponse),
        (status = 422, description = "Workbook could not be converted", body = ErrorResponse),
        (status = 500, description = "Container could not be written", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
async fn convert_rpl(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| {
            warn!("Convert request without a file field");
            ApiError::bad_request("No file provided")
        })?;

    if !upload.file_name.to_lowercase().ends_with(".xlsx") {
        warn!("Rejected upload {:?}: not an .xlsx file", upload.file_name);
        return Err(ApiError::bad_request("Only .xlsx files are supported"));
    }

    info!(
        "Received {} ({} bytes) for conversion",
        upload.file_name,
        upload.bytes.len()
    );

    // Each request gets its own directory; dropping it removes everything inside
    tokio::fs::create_dir_all(&state.upload_dir).await.map_err(|e| {
        error!("Failed to create upload directory {}: {}", state.upload_dir.display(), e);
        ApiError::internal(format!("Error processing file: {e}"))
    })?;
    let work_dir = tempfile::Builder::new()
        .prefix("rpl-")
        .tempdir_in(&state.upload_dir)
        .map_err(|e| {
            error!("Failed to create working directory: {}", e);
            ApiError::internal(format!("Error processing file: {e}"))
        })?;

    let converter = state.converter.clone();
    let output_dir = work_dir.path().to_path_buf();
    let source_name = upload.file_name.clone();
    let bytes = upload.bytes;

    let output_path = tokio::task::spawn_blocking(move || {
        converter.convert(&bytes, &source_name, &output_dir)
    })
    .await
    .map_err(|e| {
        error!("Conversion task failed: {}", e);
        ApiError::internal(format!("Error processing file: {e}"))
    })?
    .map_err(|e| {
        error!("Failed to convert {}: {}", upload.file_name, e);
        let status = if e.is_input_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        ApiError::new(status, format!("Error processing file: {e}"))
    })?;

    let body = tokio::fs::read(&output_path).await.map_err(|e| {
        error!("Failed to read container {}: {}", output_path.display(), e);
        ApiError::internal(format!("Error processing file: {e}"))
    })?;

    let download_name = output_file_name(&upload.file_name);
    info!("Returning {} ({} bytes)", download_name, body.len());

    let headers = [
        (header::CONTENT_TYPE, MIME_TYPE.to_string()),
        (header::CONTENT_DISPOSITION, attachment_disposition(&download_name)),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("Invalid upload: {}", e.body_text())))?
    {
        if field.name() != Some("file") {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), format!("Invalid upload: {}", e.body_text())))?;
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}

/// `attachment; filename="..."` with characters that would break the header replaced
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}
