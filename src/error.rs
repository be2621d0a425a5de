use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body returned for every failed render. The real cause only goes to the log.
pub const FAILURE_BODY: &str = "Failed to generate the image";

/// Everything that can go wrong between parsing a request and producing PNG bytes.
#[derive(Debug, Error)]
pub enum RenderFailure {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Record fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Content API returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Record decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Font loading failed: {0}")]
    Fonts(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Failed to allocate {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Timed out while {0}")]
    Timeout(&'static str),

    #[error("Render task failed: {0}")]
    Task(String),
}

impl IntoResponse for RenderFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to generate the image");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            FAILURE_BODY,
        )
            .into_response()
    }
}
