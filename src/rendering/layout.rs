//! Proportional cover layout.
//!
//! Every size on the cover is a fixed fraction of the canvas side length, so
//! a 300px preview and a 3000px master share the same composition.

use serde::{Deserialize, Serialize};

use super::tree::{
    Block, BlockRole, FontFamily, FontWeight, Rotation, Rule, Span, TextAlign, VisualTree,
};

/// Canvas side length used when the request does not name one.
pub const DEFAULT_DIMENSIONS: u32 = 3000;

/// Title size of the title-only layout (`text-6xl`).
pub const PLAIN_TITLE_SIZE: f64 = 60.0;

// Baseline offsets as a fraction of the font size. Close enough to the cap
// height of both families to center text optically.
const CAP_OFFSET: f64 = 0.35;
const DESCENT: f64 = 0.25;

/// Pixel metrics derived from the canvas side length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutMetrics {
    pub border: f64,
    pub spacing: f64,
    pub title_size: f64,
    pub logo_prefix_size: f64,
    pub logo_suffix_size: f64,
    pub episode_number_size: f64,
}

impl LayoutMetrics {
    /// No clamping or rounding: sub-pixel sizes are passed through.
    pub fn for_dimensions(dimensions: f64) -> Self {
        Self {
            border: dimensions * 0.0025,
            spacing: dimensions * 0.05,
            title_size: dimensions * 0.075,
            logo_prefix_size: dimensions * 0.15,
            logo_suffix_size: dimensions * 0.175,
            episode_number_size: dimensions * 0.05,
        }
    }
}

/// Presentation policy for the record-driven cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutStyle {
    #[serde(default)]
    pub with_border: bool,
    #[serde(default)]
    pub with_padding: bool,
    #[serde(default)]
    pub rotate_wordmark: bool,
    #[serde(default)]
    pub title_align: TextAlign,
}

/// The two halves of the show's wordmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wordmark {
    pub prefix: String,
    pub suffix: String,
}

impl Default for Wordmark {
    fn default() -> Self {
        Self {
            prefix: "the".to_string(),
            suffix: "podcast".to_string(),
        }
    }
}

/// Builds visual trees for one style and wordmark.
#[derive(Debug, Clone)]
pub struct LayoutResolver {
    style: LayoutStyle,
    wordmark: Wordmark,
}

impl LayoutResolver {
    pub fn new(style: LayoutStyle, wordmark: Wordmark) -> Self {
        Self { style, wordmark }
    }

    /// Lay out the episode tag, the wordmark and the title on a square canvas.
    pub fn resolve(&self, dimensions: u32, episode: i64, title: &str) -> VisualTree {
        let d = f64::from(dimensions);
        let m = LayoutMetrics::for_dimensions(d);
        let inset = if self.style.with_padding { m.spacing } else { 0.0 };
        let center = d / 2.0;

        let episode_tag = Block {
            role: BlockRole::Episode,
            x: inset,
            y: inset + m.episode_number_size,
            anchor: TextAlign::Start,
            spans: vec![Span {
                text: format!("#{episode}"),
                family: FontFamily::Body,
                weight: FontWeight::Bold,
                size: m.episode_number_size,
            }],
            rules: Vec::new(),
            rotation: None,
        };

        let rules = if self.style.with_border {
            let gap = m.logo_suffix_size / 2.0 + m.spacing / 2.0;
            let width = d - 2.0 * inset;
            vec![
                Rule {
                    x: inset,
                    y: center - gap - m.border / 2.0,
                    width,
                    thickness: m.border,
                },
                Rule {
                    x: inset,
                    y: center + gap - m.border / 2.0,
                    width,
                    thickness: m.border,
                },
            ]
        } else {
            Vec::new()
        };

        let wordmark = Block {
            role: BlockRole::Wordmark,
            x: center,
            y: center + m.logo_suffix_size * CAP_OFFSET,
            anchor: TextAlign::Middle,
            spans: vec![
                Span {
                    text: self.wordmark.prefix.clone(),
                    family: FontFamily::Heading,
                    weight: FontWeight::Regular,
                    size: m.logo_prefix_size,
                },
                Span {
                    text: self.wordmark.suffix.clone(),
                    family: FontFamily::Heading,
                    weight: FontWeight::Bold,
                    size: m.logo_suffix_size,
                },
            ],
            rules,
            rotation: self.style.rotate_wordmark.then_some(Rotation {
                degrees: -90.0,
                cx: center,
                cy: center,
            }),
        };

        let title_x = match self.style.title_align {
            TextAlign::Start => inset,
            TextAlign::Middle => center,
        };
        let title_line = Block {
            role: BlockRole::Title,
            x: title_x,
            y: d - inset - m.title_size * DESCENT,
            anchor: self.style.title_align,
            spans: vec![Span {
                text: title.to_string(),
                family: FontFamily::Body,
                weight: FontWeight::Regular,
                size: m.title_size,
            }],
            rules: Vec::new(),
            rotation: None,
        };

        VisualTree {
            width: dimensions,
            height: dimensions,
            blocks: vec![episode_tag, wordmark, title_line],
        }
    }

    /// Title-only layout: one left-aligned line, vertically centered.
    pub fn resolve_title(width: u32, height: u32, title: &str) -> VisualTree {
        VisualTree {
            width,
            height,
            blocks: vec![Block {
                role: BlockRole::Title,
                x: 0.0,
                y: f64::from(height) / 2.0 + PLAIN_TITLE_SIZE * CAP_OFFSET,
                anchor: TextAlign::Start,
                spans: vec![Span {
                    text: title.to_string(),
                    family: FontFamily::Body,
                    weight: FontWeight::Regular,
                    size: PLAIN_TITLE_SIZE,
                }],
                rules: Vec::new(),
                rotation: None,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruled() -> LayoutStyle {
        LayoutStyle {
            with_border: true,
            with_padding: true,
            rotate_wordmark: false,
            title_align: TextAlign::Start,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_metrics_are_fixed_ratios() {
        for d in [1.0, 7.0, 300.0, 1024.0, 3000.0, 8000.0] {
            let m = LayoutMetrics::for_dimensions(d);
            assert_eq!(m.border, d * 0.0025);
            assert_eq!(m.spacing, d * 0.05);
            assert_eq!(m.title_size, d * 0.075);
            assert_eq!(m.logo_prefix_size, d * 0.15);
            assert_eq!(m.logo_suffix_size, d * 0.175);
            assert_eq!(m.episode_number_size, d * 0.05);
        }
    }

    #[test]
    fn test_metrics_at_default_dimensions() {
        let m = LayoutMetrics::for_dimensions(f64::from(DEFAULT_DIMENSIONS));
        assert!(approx(m.border, 7.5));
        assert!(approx(m.spacing, 150.0));
        assert!(approx(m.title_size, 225.0));
        assert!(approx(m.logo_prefix_size, 450.0));
        assert!(approx(m.logo_suffix_size, 525.0));
        assert!(approx(m.episode_number_size, 150.0));
    }

    #[test]
    fn test_tiny_canvas_keeps_subpixel_sizes() {
        let m = LayoutMetrics::for_dimensions(1.0);
        assert!(m.border > 0.0 && m.border < 1.0);
        assert!(approx(m.border, 0.0025));
    }

    #[test]
    fn test_resolve_builds_three_blocks_in_order() {
        let tree = LayoutResolver::new(ruled(), Wordmark::default()).resolve(3000, 12, "Test");
        let roles: Vec<_> = tree.blocks.iter().map(|b| b.role).collect();
        assert_eq!(
            roles,
            vec![BlockRole::Episode, BlockRole::Wordmark, BlockRole::Title]
        );
        assert_eq!((tree.width, tree.height), (3000, 3000));
    }

    #[test]
    fn test_resolve_texts_and_fonts() {
        let tree = LayoutResolver::new(ruled(), Wordmark::default()).resolve(3000, 12, "Test");

        let episode = tree.block(BlockRole::Episode).unwrap();
        assert_eq!(episode.text(), "#12");
        assert_eq!(episode.spans[0].family, FontFamily::Body);
        assert_eq!(episode.spans[0].weight, FontWeight::Bold);
        assert!(approx(episode.spans[0].size, 150.0));

        let wordmark = tree.block(BlockRole::Wordmark).unwrap();
        assert_eq!(wordmark.text(), "thepodcast");
        assert_eq!(wordmark.spans[0].family, FontFamily::Heading);
        assert_eq!(wordmark.spans[0].weight, FontWeight::Regular);
        assert!(approx(wordmark.spans[0].size, 450.0));
        assert_eq!(wordmark.spans[1].weight, FontWeight::Bold);
        assert!(approx(wordmark.spans[1].size, 525.0));

        let title = tree.block(BlockRole::Title).unwrap();
        assert_eq!(title.text(), "Test");
        assert_eq!(title.spans[0].family, FontFamily::Body);
        assert!(approx(title.spans[0].size, 225.0));
    }

    #[test]
    fn test_border_adds_two_rules_of_border_thickness() {
        let tree = LayoutResolver::new(ruled(), Wordmark::default()).resolve(3000, 1, "x");
        let wordmark = tree.block(BlockRole::Wordmark).unwrap();
        assert_eq!(wordmark.rules.len(), 2);
        for rule in &wordmark.rules {
            assert!(approx(rule.thickness, 7.5));
            assert!(approx(rule.x, 150.0));
            assert!(approx(rule.width, 2700.0));
        }
        assert!(wordmark.rules[0].y < 1500.0 && wordmark.rules[1].y > 1500.0);
    }

    #[test]
    fn test_no_border_no_rules() {
        let style = LayoutStyle {
            with_border: false,
            ..ruled()
        };
        let tree = LayoutResolver::new(style, Wordmark::default()).resolve(3000, 1, "x");
        assert!(tree.block(BlockRole::Wordmark).unwrap().rules.is_empty());
    }

    #[test]
    fn test_padding_insets_episode_and_title() {
        let padded = LayoutResolver::new(ruled(), Wordmark::default()).resolve(1000, 3, "t");
        let flush = LayoutResolver::new(
            LayoutStyle {
                with_padding: false,
                ..ruled()
            },
            Wordmark::default(),
        )
        .resolve(1000, 3, "t");

        assert!(approx(padded.block(BlockRole::Episode).unwrap().x, 50.0));
        assert!(approx(flush.block(BlockRole::Episode).unwrap().x, 0.0));
        assert!(approx(padded.block(BlockRole::Title).unwrap().x, 50.0));
        assert!(approx(flush.block(BlockRole::Title).unwrap().x, 0.0));
        assert!(
            padded.block(BlockRole::Title).unwrap().y < flush.block(BlockRole::Title).unwrap().y
        );
    }

    #[test]
    fn test_rotation_only_on_wordmark() {
        let style = LayoutStyle {
            rotate_wordmark: true,
            ..ruled()
        };
        let tree = LayoutResolver::new(style, Wordmark::default()).resolve(2000, 5, "t");
        let rotation = tree.block(BlockRole::Wordmark).unwrap().rotation.unwrap();
        assert_eq!(rotation.degrees, -90.0);
        assert_eq!((rotation.cx, rotation.cy), (1000.0, 1000.0));
        assert!(tree.block(BlockRole::Episode).unwrap().rotation.is_none());
        assert!(tree.block(BlockRole::Title).unwrap().rotation.is_none());
    }

    #[test]
    fn test_centered_title() {
        let style = LayoutStyle {
            title_align: TextAlign::Middle,
            ..ruled()
        };
        let tree = LayoutResolver::new(style, Wordmark::default()).resolve(2000, 5, "t");
        let title = tree.block(BlockRole::Title).unwrap();
        assert_eq!(title.anchor, TextAlign::Middle);
        assert_eq!(title.x, 1000.0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = LayoutResolver::new(ruled(), Wordmark::default());
        assert_eq!(
            resolver.resolve(1400, 42, "Same"),
            resolver.resolve(1400, 42, "Same")
        );
    }

    #[test]
    fn test_negative_episode_numbers_render_verbatim() {
        let tree = LayoutResolver::new(ruled(), Wordmark::default()).resolve(100, -1, "t");
        assert_eq!(tree.block(BlockRole::Episode).unwrap().text(), "#-1");
    }

    #[test]
    fn test_resolve_title_single_block() {
        let tree = LayoutResolver::resolve_title(1200, 630, "My Default Title");
        assert_eq!((tree.width, tree.height), (1200, 630));
        assert_eq!(tree.blocks.len(), 1);
        let block = &tree.blocks[0];
        assert_eq!(block.role, BlockRole::Title);
        assert_eq!(block.anchor, TextAlign::Start);
        assert_eq!(block.spans[0].size, PLAIN_TITLE_SIZE);
        assert_eq!(block.spans[0].family, FontFamily::Body);
        assert!(approx(block.y, 315.0 + 60.0 * 0.35));
    }
}
