//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{self, QueryPairs};
use crate::assets::AssetLoader;
use crate::error::RenderFailure;
use crate::models::AppConfig;
use crate::rendering::SvgRenderer;
use crate::services::{
    AssetFontSource, CoverPipeline, FontCache, FontSource, HttpTrackSource, RenderService,
    TrackSource,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub fonts: Arc<FontCache>,
    pub pipeline: Arc<CoverPipeline>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    let tracks = Arc::new(
        HttpTrackSource::new(&config.content_api)
            .map_err(|e| anyhow::anyhow!("Failed to create content API client: {e}"))?,
    );
    let font_source = Arc::new(AssetFontSource::new(asset_loader.clone()));

    create_app_state_with(config, &asset_loader, tracks, font_source)
}

/// Create application state with explicit collaborators.
///
/// Tests use this to substitute the track source or the font source.
pub fn create_app_state_with(
    config: Arc<AppConfig>,
    asset_loader: &AssetLoader,
    tracks: Arc<dyn TrackSource>,
    font_source: Arc<dyn FontSource>,
) -> anyhow::Result<AppState> {
    let template = asset_loader
        .read_template_string()
        .map_err(|e| anyhow::anyhow!("Failed to read cover template: {e}"))?;
    let svg_renderer = SvgRenderer::new(&template, config.colors.clone())
        .map_err(|e| anyhow::anyhow!("Invalid cover template: {e}"))?;

    let fonts = Arc::new(FontCache::new(font_source, config.render.system_fonts));
    let renderer = Arc::new(RenderService::new(
        svg_renderer,
        fonts.clone(),
        config.render.max_concurrent,
        config.render.timeout(),
    ));
    let pipeline = Arc::new(CoverPipeline::new(config, tracks, renderer));

    Ok(AppState { fonts, pipeline })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/title-art", get(handle_title_art))
        .route("/api/album-art", get(handle_album_art))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_title_art(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, RenderFailure> {
    api::handle_title_art(State(state.pipeline), query).await
}

async fn handle_album_art(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, RenderFailure> {
    api::handle_album_art(State(state.pipeline), query).await
}
