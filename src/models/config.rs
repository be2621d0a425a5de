use crate::assets::AssetLoader;
use crate::rendering::{Colors, LayoutStyle, TextAlign, Wordmark};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub content_api: ContentApiConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub colors: Colors,

    #[serde(default)]
    pub wordmark: Wordmark,

    /// Variant used when a request names none (or an unknown one)
    #[serde(default = "default_variant")]
    pub default_variant: String,

    /// Named layout styles
    #[serde(default = "default_variants")]
    pub variants: HashMap<String, LayoutStyle>,
}

fn default_variant() -> String {
    "ruled".to_string()
}

fn default_variants() -> HashMap<String, LayoutStyle> {
    HashMap::from([
        (
            "plain".to_string(),
            LayoutStyle {
                with_border: false,
                with_padding: false,
                rotate_wordmark: false,
                title_align: TextAlign::Middle,
            },
        ),
        (
            "ruled".to_string(),
            LayoutStyle {
                with_border: true,
                with_padding: true,
                rotate_wordmark: false,
                title_align: TextAlign::Start,
            },
        ),
        (
            "rotated".to_string(),
            LayoutStyle {
                with_border: true,
                with_padding: true,
                rotate_wordmark: true,
                title_align: TextAlign::Start,
            },
        ),
    ])
}

/// Where track records come from
#[derive(Debug, Deserialize, Clone)]
pub struct ContentApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/tracks".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for ContentApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

impl ContentApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_render_timeout")]
    pub timeout_secs: u64,

    /// Largest accepted width, height or size
    #[serde(default = "default_max_dimensions")]
    pub max_dimensions: u32,

    /// Also load system fonts, for glyphs the bundled faces lack
    #[serde(default = "default_system_fonts")]
    pub system_fonts: bool,

    /// Renders allowed to hold a pixmap at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_render_timeout() -> u64 {
    30
}

fn default_max_dimensions() -> u32 {
    8000
}

fn default_system_fonts() -> bool {
    true
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_render_timeout(),
            max_dimensions: default_max_dimensions(),
            system_fonts: default_system_fonts(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl RenderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    ///
    /// `CONTENT_API_URL` replaces the configured base URL when set.
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        let mut config = match loader.read_config_string() {
            Ok(content) => Self::from_yaml(&content),
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var("CONTENT_API_URL") {
            config.content_api.base_url = url;
        }

        tracing::info!(
            content_api = %config.content_api.base_url,
            variants = config.variants.len(),
            default_variant = %config.default_variant,
            "Loaded configuration"
        );

        config
    }

    /// Parse YAML, falling back to defaults on error
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Style for a variant name; unknown or absent names get the default variant.
    pub fn layout_style(&self, variant: Option<&str>) -> LayoutStyle {
        if let Some(style) = variant.and_then(|name| self.variants.get(name)) {
            return *style;
        }
        if let Some(name) = variant {
            tracing::debug!(variant = %name, "Unknown variant, using default");
        }
        self.variants
            .get(&self.default_variant)
            .copied()
            .unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_api: ContentApiConfig::default(),
            render: RenderConfig::default(),
            colors: Colors::default(),
            wordmark: Wordmark::default(),
            default_variant: default_variant(),
            variants: default_variants(),
        }
    }
}
