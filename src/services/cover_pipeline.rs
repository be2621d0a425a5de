use std::sync::Arc;

use crate::error::RenderFailure;
use crate::models::{AppConfig, RenderRequest};
use crate::rendering::{LayoutResolver, VisualTree};
use crate::services::{RenderService, TrackSource};

/// Cover pipeline that orchestrates record lookup → layout → render
pub struct CoverPipeline {
    config: Arc<AppConfig>,
    tracks: Arc<dyn TrackSource>,
    renderer: Arc<RenderService>,
}

impl CoverPipeline {
    pub fn new(
        config: Arc<AppConfig>,
        tracks: Arc<dyn TrackSource>,
        renderer: Arc<RenderService>,
    ) -> Self {
        Self {
            config,
            tracks,
            renderer,
        }
    }

    /// Lay out the title-only cover
    pub fn compose_title(&self, request: &RenderRequest) -> VisualTree {
        LayoutResolver::resolve_title(request.width, request.height, &request.title)
    }

    /// Fetch the episode record and lay out the full cover
    pub async fn compose_episode(
        &self,
        request: &RenderRequest,
        variant: Option<&str>,
    ) -> Result<VisualTree, RenderFailure> {
        let id = request
            .episode_id
            .as_deref()
            .ok_or(RenderFailure::MissingParameter("id"))?;

        let track = self.tracks.fetch_track(id).await?;

        let resolver = LayoutResolver::new(
            self.config.layout_style(variant),
            self.config.wordmark.clone(),
        );
        Ok(resolver.resolve(request.dimensions(), track.episode, &track.title))
    }

    pub async fn render(&self, tree: VisualTree) -> Result<Vec<u8>, RenderFailure> {
        self.renderer.render(tree).await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
