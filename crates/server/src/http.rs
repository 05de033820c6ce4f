//! Routes of the itinerary service.
//!
//! `POST /generate-itinerary` renders a document on the blocking pool and
//! answers with its public link; `GET /pdfs/:file` serves documents back from
//! the output directory.

use std::io;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use itinerary_pdf::{create_pdf, ItineraryRequest, ItineraryResponse, RenderOptions};
use log::{debug, error, info};
use serde_json::json;

use crate::config::Args;
use crate::error_chain;

pub const GENERATE_ROUTE: &str = "/generate-itinerary";
pub const DOWNLOAD_ROUTE: &str = "/pdfs/:file";
pub const HEALTH_ROUTE: &str = "/health";

const SUCCESS_MESSAGE: &str = "Itinerary generated successfully";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub render: Arc<RenderOptions>,
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(render: RenderOptions, public_base_url: impl Into<String>) -> Self {
        let base: String = public_base_url.into();
        Self {
            render: Arc::new(render),
            public_base_url: Arc::from(base.trim_end_matches('/')),
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(args.render_options(), args.public_base_url.clone())
    }

    /// Public link for a file written into the output directory.
    pub fn download_url(&self, file_name: &str) -> String {
        format!("{}/pdfs/{}", self.public_base_url, file_name)
    }
}

/// Errors surfaced to HTTP clients. Messages are fixed; causes go to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid input")]
    InvalidInput,

    #[error("Failed to generate PDF")]
    RenderFailed,

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::RenderFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(HEALTH_ROUTE, get(health))
        .route(GENERATE_ROUTE, post(generate_itinerary))
        .route(DOWNLOAD_ROUTE, get(download_pdf))
}

pub fn router(state: AppState) -> Router {
    routes().with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate_itinerary(
    State(st): State<AppState>,
    body: Bytes,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let request = ItineraryRequest::from_json_slice(&body).map_err(|err| {
        debug!("rejecting itinerary request: {err}");
        ApiError::InvalidInput
    })?;

    let options = Arc::clone(&st.render);
    let path = tokio::task::spawn_blocking(move || create_pdf(&request, &options))
        .await
        .map_err(|err| {
            error!("render task failed: {err}");
            ApiError::RenderFailed
        })?
        .map_err(|err| {
            error!("{}", error_chain(&err));
            ApiError::RenderFailed
        })?;

    let file_name = file_name_of(&path).ok_or_else(|| {
        error!("rendered path {} has no file name", path.display());
        ApiError::RenderFailed
    })?;
    info!("generated itinerary {}", path.display());

    Ok(Json(ItineraryResponse {
        message: SUCCESS_MESSAGE.to_owned(),
        file_path: st.download_url(&file_name),
    }))
}

async fn download_pdf(
    State(st): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    if !is_plain_file_name(&file) {
        return Err(ApiError::NotFound);
    }
    let path = st.render.output_dir.join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ApiError::NotFound),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            Err(ApiError::NotFound)
        }
    }
}

/// Only single path components are served; anything that could leave the
/// output directory is treated as missing.
fn is_plain_file_name(file: &str) -> bool {
    !file.is_empty()
        && file != "."
        && file != ".."
        && !file.contains(['/', '\\'])
        && !file.chars().any(char::is_control)
}

fn file_name_of(path: &FsPath) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_names_only() {
        assert!(is_plain_file_name("itinerary_Jane_2025-05-01.pdf"));
        assert!(is_plain_file_name("itinerary_.._.._2025.pdf"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../secret.pdf"));
        assert!(!is_plain_file_name("a\\b.pdf"));
        assert!(!is_plain_file_name(""));
    }

    #[test]
    fn download_url_ignores_trailing_slash() {
        let state = AppState::new(RenderOptions::default(), "http://example.test/");
        assert_eq!(
            state.download_url("itinerary_A_B.pdf"),
            "http://example.test/pdfs/itinerary_A_B.pdf"
        );
    }

    #[test]
    fn api_errors_map_to_statuses() {
        assert_eq!(ApiError::InvalidInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::RenderFailed.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }
}
