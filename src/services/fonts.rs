//! Process-wide font loading.
//!
//! Every font file (FONTS_DIR, then embedded) is loaded once, on first use or
//! when the server warms the cache at startup. Every request then shares the
//! same immutable font database. The load fails unless all four required
//! faces are present, and a failed load is remembered and never retried.

use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::assets::AssetLoader;
use crate::error::RenderFailure;
use crate::rendering::{FontFamily, FontWeight};

/// A family role at one weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFace {
    pub family: FontFamily,
    pub weight: FontWeight,
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.family.families().join(" / "),
            self.weight.value()
        )
    }
}

/// The faces every cover uses. Loading fails if any is missing.
pub const REQUIRED_FACES: [FontFace; 4] = [
    FontFace {
        family: FontFamily::Heading,
        weight: FontWeight::Regular,
    },
    FontFace {
        family: FontFamily::Heading,
        weight: FontWeight::Bold,
    },
    FontFace {
        family: FontFamily::Body,
        weight: FontWeight::Regular,
    },
    FontFace {
        family: FontFamily::Body,
        weight: FontWeight::Bold,
    },
];

/// Raw bytes of one font file
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub name: String,
    pub data: Cow<'static, [u8]>,
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Failed to read fonts: {0}")]
    Read(#[from] io::Error),

    #[error("Missing font faces: {0}")]
    MissingFaces(String),

    #[error("Font task failed: {0}")]
    Task(String),
}

/// Something that can produce the font binaries.
#[async_trait]
pub trait FontSource: Send + Sync {
    async fn load(&self) -> Result<Vec<FontAsset>, FontError>;
}

/// Loads every font file through the asset loader.
pub struct AssetFontSource {
    loader: Arc<AssetLoader>,
}

impl AssetFontSource {
    pub fn new(loader: Arc<AssetLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl FontSource for AssetFontSource {
    async fn load(&self) -> Result<Vec<FontAsset>, FontError> {
        let loader = self.loader.clone();

        let fonts = tokio::task::spawn_blocking(move || loader.read_fonts())
            .await
            .map_err(|e| FontError::Task(e.to_string()))??;

        Ok(fonts
            .into_iter()
            .map(|(name, data)| FontAsset { name, data })
            .collect())
    }
}

/// Loaded fonts, ready for usvg
#[derive(Debug)]
pub struct FontBook {
    database: Arc<fontdb::Database>,
}

impl FontBook {
    /// Build the font database from `assets`.
    ///
    /// The required faces must come from `assets`; system fonts are added
    /// afterwards and only widen glyph coverage.
    pub fn new(assets: Vec<FontAsset>, system_fonts: bool) -> Result<Self, FontError> {
        let mut database = fontdb::Database::new();
        let file_count = assets.len();

        for asset in assets {
            let before = database.len();
            database.load_font_data(asset.data.into_owned());
            if database.len() > before {
                tracing::debug!(font = %asset.name, "Loaded font");
            } else {
                tracing::warn!(font = %asset.name, "Font data could not be parsed");
            }
        }

        let missing: Vec<String> = REQUIRED_FACES
            .iter()
            .filter(|face| !has_face(&database, **face))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(FontError::MissingFaces(missing.join(", ")));
        }

        if system_fonts {
            database.load_system_fonts();
        }

        tracing::info!(
            files = file_count,
            font_count = database.len(),
            system_fonts,
            "Loaded fonts for cover rendering"
        );

        Ok(Self {
            database: Arc::new(database),
        })
    }

    pub fn database(&self) -> Arc<fontdb::Database> {
        self.database.clone()
    }
}

/// Whether `database` has an upright face of one of the role's families at
/// exactly the requested weight.
fn has_face(database: &fontdb::Database, face: FontFace) -> bool {
    let names = face.family.families();
    database.faces().any(|info| {
        info.style == fontdb::Style::Normal
            && info.weight.0 == face.weight.value()
            && info
                .families
                .iter()
                .any(|(name, _)| names.contains(&name.as_str()))
    })
}

/// Lazily initialized, process-lifetime font set.
pub struct FontCache {
    source: Arc<dyn FontSource>,
    system_fonts: bool,
    cell: OnceCell<Result<Arc<FontBook>, String>>,
}

impl FontCache {
    pub fn new(source: Arc<dyn FontSource>, system_fonts: bool) -> Self {
        Self {
            source,
            system_fonts,
            cell: OnceCell::new(),
        }
    }

    /// Wait for the font set, starting the load if nobody has yet.
    ///
    /// Concurrent callers share one in-flight load.
    pub async fn get(&self) -> Result<Arc<FontBook>, RenderFailure> {
        self.cell
            .get_or_init(|| async { self.load().await.map_err(|e| e.to_string()) })
            .await
            .clone()
            .map_err(RenderFailure::Fonts)
    }

    /// Start loading in the background so the first request does not pay for it.
    pub fn warm(self: &Arc<Self>) {
        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.get().await {
                tracing::error!(error = %e, "Font preload failed");
            }
        });
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    async fn load(&self) -> Result<Arc<FontBook>, FontError> {
        let assets = self.source.load().await?;
        let system_fonts = self.system_fonts;

        let book = tokio::task::spawn_blocking(move || FontBook::new(assets, system_fonts))
            .await
            .map_err(|e| FontError::Task(e.to_string()))??;

        Ok(Arc::new(book))
    }
}
