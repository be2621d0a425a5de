use resvg::usvg::{self, Transform};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use tera::{Context, Tera};
use tiny_skia::Pixmap;

use super::tree::VisualTree;
use crate::error::RenderFailure;

const TEMPLATE_NAME: &str = "cover.svg";

/// Fill colors for the cover, as SVG color strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_foreground")]
    pub foreground: String,
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_foreground() -> String {
    "#111111".to_string()
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            background: default_background(),
            foreground: default_foreground(),
        }
    }
}

/// Lowers visual trees to SVG with a Tera template and rasterizes them to PNG.
///
/// Text is escaped by Tera's autoescape, which is enabled for the `.svg`
/// template, so titles from the content API cannot break the document.
pub struct SvgRenderer {
    tera: Tera,
    colors: Colors,
}

impl SvgRenderer {
    pub fn new(template: &str, colors: Colors) -> Result<Self, RenderFailure> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".svg"]);
        tera.add_raw_template(TEMPLATE_NAME, template)?;

        Ok(Self { tera, colors })
    }

    /// Render the tree into an SVG document.
    pub fn to_svg(&self, tree: &VisualTree) -> Result<String, RenderFailure> {
        let mut context = Context::from_serialize(tree)?;
        context.insert("background", &self.colors.background);
        context.insert("foreground", &self.colors.foreground);

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// Render the tree to PNG bytes of exactly `tree.width` x `tree.height`.
    ///
    /// CPU-bound; callers on the async runtime should use `spawn_blocking`.
    pub fn render_to_png(
        &self,
        tree: &VisualTree,
        fontdb: Arc<fontdb::Database>,
    ) -> Result<Vec<u8>, RenderFailure> {
        let svg = self.to_svg(tree)?;
        tracing::trace!(svg_len = svg.len(), "Cover SVG composed");

        let pixmap = rasterize_svg(svg.as_bytes(), tree.width, tree.height, fontdb)?;
        encode_png(&pixmap)
    }
}

/// Parse and rasterize SVG onto a `width` x `height` RGBA pixmap
fn rasterize_svg(
    svg_data: &[u8],
    width: u32,
    height: u32,
    fontdb: Arc<fontdb::Database>,
) -> Result<Pixmap, RenderFailure> {
    let options = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg_data, &options)
        .map_err(|e| RenderFailure::SvgParse(e.to_string()))?;

    let svg_size = tree.size();
    let scale_x = width as f32 / svg_size.width();
    let scale_y = height as f32 / svg_size.height();

    // The template paints the configured background; the pixmap starts transparent.
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderFailure::PixmapAllocation { width, height })?;

    resvg::render(
        &tree,
        Transform::from_scale(scale_x, scale_y),
        &mut pixmap.as_mut(),
    );

    Ok(pixmap)
}

/// Encode an RGBA pixmap as an 8-bit truecolor PNG.
fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderFailure> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderFailure::PngEncode(e.to_string()))?;
        writer
            .write_image_data(pixmap.data())
            .map_err(|e| RenderFailure::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
