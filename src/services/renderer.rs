use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::error::RenderFailure;
use crate::rendering::{SvgRenderer, VisualTree};
use crate::services::FontCache;

/// Async front of the rasterizer: waits for fonts, then renders off the runtime.
///
/// At most `max_concurrent` renders hold a pixmap at once. A render that
/// times out keeps its permit until the blocking task finishes.
pub struct RenderService {
    svg_renderer: Arc<SvgRenderer>,
    fonts: Arc<FontCache>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl RenderService {
    pub fn new(
        svg_renderer: SvgRenderer,
        fonts: Arc<FontCache>,
        max_concurrent: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            svg_renderer: Arc::new(svg_renderer),
            fonts,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    /// Render a visual tree to PNG bytes
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime during
    /// CPU-intensive rasterization and PNG encoding. Waiting for a permit
    /// counts against the timeout.
    pub async fn render(&self, tree: VisualTree) -> Result<Vec<u8>, RenderFailure> {
        let fonts = self.fonts.get().await?;
        let renderer = self.svg_renderer.clone();
        let permits = self.permits.clone();

        let job = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|e| RenderFailure::Task(e.to_string()))?;

            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                renderer.render_to_png(&tree, fonts.database())
            })
            .await
            .map_err(|e| RenderFailure::Task(e.to_string()))?
        };

        match tokio::time::timeout(self.timeout, job).await {
            Ok(result) => result,
            Err(_) => Err(RenderFailure::Timeout("rendering")),
        }
    }
}
