pub mod layout;
pub mod svg_to_png;
pub mod tree;

pub use layout::{LayoutMetrics, LayoutResolver, LayoutStyle, Wordmark, DEFAULT_DIMENSIONS};
pub use svg_to_png::{Colors, SvgRenderer};
pub use tree::{
    Block, BlockRole, FontFamily, FontWeight, Rotation, Rule, Span, TextAlign, VisualTree,
};
