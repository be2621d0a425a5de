//! The visual tree handed to the renderer.
//!
//! Coordinates are in canvas pixels. Text positions are baseline anchors,
//! which is what SVG `<text x y>` expects.

use serde::{Deserialize, Serialize, Serializer};

/// The two typographic roles on a cover.
///
/// Each role names a preferred family followed by the bundled fallback. The
/// template emits the whole list, so a Karla or Inconsolata dropped into
/// `FONTS_DIR` takes precedence over the bundled DejaVu faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Used for the wordmark.
    Heading,
    /// Monospace, used for the episode tag and the title.
    Body,
}

impl FontFamily {
    /// Family names in order of preference
    pub fn families(self) -> &'static [&'static str] {
        match self {
            FontFamily::Heading => &["Karla", "DejaVu Sans"],
            FontFamily::Body => &["Inconsolata", "DejaVu Sans Mono"],
        }
    }
}

impl Serialize for FontFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.families().join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    /// CSS numeric weight
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.value())
    }
}

/// Horizontal anchoring of a text block relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Start,
    #[default]
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockRole {
    Episode,
    Wordmark,
    Title,
}

/// A run of text sharing one font face and size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Span {
    pub text: String,
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size: f64,
}

/// A horizontal rule. `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rule {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub thickness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rotation {
    pub degrees: f64,
    pub cx: f64,
    pub cy: f64,
}

/// One line of styled text plus its decorations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub role: BlockRole,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAlign,
    pub spans: Vec<Span>,
    pub rules: Vec<Rule>,
    pub rotation: Option<Rotation>,
}

impl Block {
    /// Concatenated text of all spans
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualTree {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<Block>,
}

impl VisualTree {
    pub fn block(&self, role: BlockRole) -> Option<&Block> {
        self.blocks.iter().find(|b| b.role == role)
    }
}
