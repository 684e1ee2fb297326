//! HTTP API
//!
//! Exposes `POST /api/XmlToJson/convert`, which fetches the schema at the
//! requested URL and returns its documentation summary as JSON.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::error::Error;
use crate::extractor::extract_with_limits;
use crate::loaders::Loader;
use crate::model::{is_blank, ExtractionResult};

/// Path of the conversion endpoint
pub const CONVERT_PATH: &str = "/api/XmlToJson/convert";

/// Message returned when the request carries no usable URL
pub const MISSING_URL_MESSAGE: &str = "A valid URL is required.";

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Schema loader
    pub loader: Arc<Loader>,
}

impl AppState {
    /// Wrap a loader for use as router state
    pub fn new(loader: Loader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }
}

/// Request body of the convert endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Location of the XSD document
    #[serde(default, alias = "XmlDataUrl")]
    pub xml_data_url: Option<String>,
}

/// Error returned by handlers, rendered as a plain-text body
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
        }
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(CONVERT_PATH, post(convert))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ExtractionResult>, Response> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected convert request body: {}", rejection.body_text());
        (StatusCode::BAD_REQUEST, rejection.body_text()).into_response()
    })?;

    convert_url(&state, request.xml_data_url.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            if !e.0.is_client_error() {
                warn!("Schema conversion failed: {}", e.0);
            }
            e.into_response()
        })
}

/// Fetch the schema at `url` and extract its documentation
pub async fn convert_url(state: &AppState, url: Option<&str>) -> Result<ExtractionResult, ApiError> {
    let url = match url {
        Some(url) if !is_blank(Some(url)) => url,
        _ => return Err(Error::Validation(MISSING_URL_MESSAGE.to_string()).into()),
    };

    info!("Converting schema from {}", url);
    let xml = state.loader.fetch(url).await?;
    let result = extract_with_limits(&xml, state.loader.limits())?;

    info!(
        simple_types = result.simple_types.len(),
        complex_types = result.complex_types.len(),
        "Converted schema from {}",
        url
    );
    Ok(result)
}
