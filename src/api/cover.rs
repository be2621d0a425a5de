use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::RenderFailure;
use crate::models::RenderRequest;
use crate::services::CoverPipeline;

/// Query string as decoded key/value pairs, in order.
pub type QueryPairs = Vec<(String, String)>;

/// Raw query parameters shared by both cover endpoints.
///
/// Everything is kept as a string so that a bad number falls back to its
/// default instead of being rejected by the extractor.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoverQuery {
    pub width: Option<String>,
    pub height: Option<String>,
    pub title: Option<String>,
    pub id: Option<String>,
    pub size: Option<String>,
    pub variant: Option<String>,
}

impl CoverQuery {
    /// Pick the known parameters out of `pairs`.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: QueryPairs) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "width" => &mut query.width,
                "height" => &mut query.height,
                "title" => &mut query.title,
                "id" => &mut query.id,
                "size" => &mut query.size,
                "variant" => &mut query.variant,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

fn parse_query(
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<CoverQuery, RenderFailure> {
    query
        .map(|Query(pairs)| CoverQuery::from_pairs(pairs))
        .map_err(|e| RenderFailure::InvalidQuery(e.body_text()))
}

/// Render a title-only cover
///
/// Returns a PNG with the title on a plain canvas.
#[utoipa::path(
    get,
    path = "/api/title-art",
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 500, description = "Failed to generate the image", body = String, content_type = "text/plain"),
    ),
    params(
        ("width" = Option<u32>, Query, description = "Image width in pixels (default: 3000)"),
        ("height" = Option<u32>, Query, description = "Image height in pixels (default: 3000)"),
        ("title" = Option<String>, Query, description = "Title text (default: 'My Default Title')"),
    ),
    tag = "Cover"
)]
pub async fn handle_title_art(
    State(pipeline): State<Arc<CoverPipeline>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, RenderFailure> {
    let query = parse_query(query)?;
    let request = RenderRequest::for_title(
        query.width.as_deref(),
        query.height.as_deref(),
        query.title.as_deref(),
        pipeline.config().render.max_dimensions,
    );

    tracing::info!(
        width = request.width,
        height = request.height,
        title = %request.title,
        "Title art request received"
    );

    let tree = pipeline.compose_title(&request);
    let png_bytes = pipeline.render(tree).await?;

    Ok(png_response(png_bytes))
}

/// Render an episode cover from a track record
///
/// Fetches the record for `id` from the content API and renders the episode
/// tag, wordmark and title on a square canvas.
#[utoipa::path(
    get,
    path = "/api/album-art",
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 500, description = "Failed to generate the image", body = String, content_type = "text/plain"),
    ),
    params(
        ("id" = String, Query, description = "Track record id"),
        ("size" = Option<u32>, Query, description = "Side length in pixels (default: 3000)"),
        ("variant" = Option<String>, Query, description = "Layout variant: 'plain', 'ruled' or 'rotated'"),
    ),
    tag = "Cover"
)]
pub async fn handle_album_art(
    State(pipeline): State<Arc<CoverPipeline>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, RenderFailure> {
    let query = parse_query(query)?;
    let request = RenderRequest::for_episode(
        query.id.as_deref(),
        query.size.as_deref(),
        pipeline.config().render.max_dimensions,
    );

    tracing::info!(
        id = ?request.episode_id,
        size = request.width,
        variant = ?query.variant,
        "Album art request received"
    );

    let tree = pipeline
        .compose_episode(&request, query.variant.as_deref())
        .await?;
    let png_bytes = pipeline.render(tree).await?;

    Ok(png_response(png_bytes))
}

fn png_response(png_bytes: Vec<u8>) -> Response {
    tracing::info!(size_bytes = png_bytes.len(), "Image rendered successfully");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, png_bytes.len().to_string()),
        ],
        Bytes::from(png_bytes),
    )
        .into_response()
}
