pub mod config;
pub mod render_request;
pub mod track;

pub use config::{AppConfig, ContentApiConfig, RenderConfig};
pub use render_request::{parse_dimension, RenderRequest, DEFAULT_TITLE};
pub use track::TrackRecord;
