//! HTTP routes: health check and multipart image upload.
//!
//! The upload handler is thin transport glue around
//! [`panscan_pipeline::analyze_staged`]: validate the multipart part,
//! run the pipeline on a blocking thread, and serialize the result
//! with inline PNG previews of every stage.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use panscan_pipeline::{
    Classification, Dimensions, FeatureSet, PipelineConfig, StagedAnalysis, analyze_staged,
};

use crate::encode::{self, EncodeError};
use crate::error::ApiError;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Upload extensions accepted by the service.
const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Multipart field name carrying the image.
const FILE_FIELD: &str = "file";

/// Immutable process-wide state, constructed once in `main` and
/// shared by reference across request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pipeline parameters, fixed for the lifetime of the process.
    pub config: PipelineConfig,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Successful upload response: the classification triple, the feature
/// scalars it was derived from, and an inline PNG preview per stage.
#[derive(Debug, Serialize)]
struct UploadResponse {
    #[serde(flatten)]
    classification: Classification,
    features: FeatureSet,
    dimensions: Dimensions,
    steps: BTreeMap<&'static str, String>,
}

async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("malformed multipart body: {err}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::BadRequest(format!("failed to read upload: {err}")))?;
        file = Some((filename, bytes.to_vec()));
        break;
    }

    let Some((filename, bytes)) = file else {
        return Err(ApiError::BadRequest("no file provided".into()));
    };
    if filename.is_empty() {
        return Err(ApiError::BadRequest("no file selected".into()));
    }
    if !has_allowed_extension(&filename) {
        return Err(ApiError::BadRequest(
            "unsupported file extension (allowed: png, jpg, jpeg)".into(),
        ));
    }

    // The pipeline is pure CPU work; keep it off the async executor.
    let config = state.config;
    let staged = tokio::task::spawn_blocking(move || analyze_staged(&bytes, &config))
        .await
        .map_err(|err| {
            tracing::error!("analysis task failed to complete: {err}");
            ApiError::Internal
        })?
        .map_err(|err| {
            tracing::error!("analysis of {filename:?} failed: {err}");
            ApiError::Internal
        })?;

    Ok(Json(build_response(&staged)?))
}

/// Case-insensitive extension check against [`ALLOWED_EXTENSIONS`].
fn has_allowed_extension(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

fn build_response(staged: &StagedAnalysis) -> Result<UploadResponse, ApiError> {
    let mut steps = BTreeMap::new();
    steps.insert(
        "original",
        encoded("original", encode::rgb_to_data_url(&staged.original))?,
    );
    steps.insert(
        "preprocessed",
        encoded("preprocessed", encode::gray_to_data_url(&staged.equalized))?,
    );
    steps.insert(
        "segmented",
        encoded("segmented", encode::gray_to_data_url(&staged.segmented))?,
    );
    steps.insert(
        "features",
        encoded("features", encode::rgb_to_data_url(&staged.overlay))?,
    );

    Ok(UploadResponse {
        classification: staged.analysis.classification.clone(),
        features: staged.analysis.features,
        dimensions: staged.analysis.dimensions,
        steps,
    })
}

fn encoded(step: &'static str, result: Result<String, EncodeError>) -> Result<String, ApiError> {
    result.map_err(|err| {
        tracing::error!("failed to encode {step} preview: {err}");
        ApiError::Internal
    })
}
