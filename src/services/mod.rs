pub mod cover_pipeline;
pub mod fonts;
pub mod renderer;
pub mod track_source;

pub use cover_pipeline::CoverPipeline;
pub use fonts::{
    AssetFontSource, FontAsset, FontBook, FontCache, FontError, FontFace, FontSource,
    REQUIRED_FACES,
};
pub use renderer::RenderService;
pub use track_source::{HttpTrackSource, TrackSource};
