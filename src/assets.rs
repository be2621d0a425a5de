//! Asset loading with embedded fallbacks
//!
//! Fonts, the cover template and the config file are compiled into the
//! binary. Each category can be overridden from the filesystem:
//!
//! - If an env var is NOT set: use embedded assets only (no filesystem access)
//! - If an env var IS set and path is empty/missing: seed with embedded assets, then use filesystem
//! - If an env var IS set and path has files: use filesystem with embedded fallback

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded font assets
#[derive(RustEmbed)]
#[folder = "fonts/"]
#[include = "*.ttf"]
#[include = "*.otf"]
struct EmbeddedFonts;

/// Embedded SVG templates
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.svg"]
struct EmbeddedTemplates;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// File name of the cover template
pub const COVER_TEMPLATE: &str = "cover.svg";

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Fonts,
    Templates,
    Config,
}

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub fonts_seeded: Vec<String>,
    pub templates_seeded: Vec<String>,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.fonts_seeded.is_empty() && self.templates_seeded.is_empty() && !self.config_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External fonts directory (from FONTS_DIR env var)
    fonts_dir: Option<PathBuf>,
    /// External templates directory (from TEMPLATES_DIR env var)
    templates_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    /// If `None`, embedded assets are used exclusively.
    pub fn new(
        fonts_dir: Option<PathBuf>,
        templates_dir: Option<PathBuf>,
        config_file: Option<PathBuf>,
    ) -> Self {
        Self {
            fonts_dir,
            templates_dir,
            config_file,
        }
    }

    /// Create a loader from FONTS_DIR, TEMPLATES_DIR and CONFIG_FILE
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("FONTS_DIR").ok().map(PathBuf::from),
            std::env::var("TEMPLATES_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Read every font file, for loading into fontdb
    ///
    /// Returns a merged list: files in the fonts directory override embedded
    /// files with the same name. A font file that exists but cannot be read
    /// is an error.
    pub fn read_fonts(&self) -> io::Result<Vec<(String, Cow<'static, [u8]>)>> {
        let mut fonts = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if let Some(ref dir) = self.fonts_dir {
            if dir.is_dir() {
                for entry in fs::read_dir(dir)? {
                    let entry = entry?;
                    let path = entry.path();
                    let is_font = path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| matches!(ext, "ttf" | "otf"));
                    if !is_font {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy().to_string();
                    tracing::trace!(font = %name, "Loading font from filesystem");
                    fonts.push((name.clone(), Cow::Owned(fs::read(&path)?)));
                    seen.insert(name);
                }
            }
        }

        for file in EmbeddedFonts::iter() {
            let name = file.to_string();
            if seen.contains(&name) {
                continue;
            }
            if let Some(data) = EmbeddedFonts::get(&name) {
                tracing::trace!(font = %name, "Loading font from embedded assets");
                fonts.push((name, data.data));
            }
        }

        Ok(fonts)
    }

    /// Read the cover template as a UTF-8 string
    pub fn read_template_string(&self) -> io::Result<String> {
        let bytes = self.read_template(COVER_TEMPLATE)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn read_template(&self, file_name: &str) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.templates_dir {
            let full_path = dir.join(file_name);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading template from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        EmbeddedTemplates::get(file_name)
            .map(|f| f.data)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Template not found: {file_name}"),
                )
            })
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Check if a directory exists and is empty (ignoring .gitkeep)
    fn is_empty_dir(path: &Path) -> bool {
        if !path.exists() || !path.is_dir() {
            return false;
        }
        path.read_dir()
            .map(|mut entries| {
                entries.all(|e| {
                    e.map(|entry| entry.file_name() == ".gitkeep")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Seed empty/missing directories with embedded assets
    ///
    /// Only operates on paths that were configured (env var was set).
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref dir) = self.fonts_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                report.fonts_seeded = write_embedded::<EmbeddedFonts>(dir)?;
            }
        }

        if let Some(ref dir) = self.templates_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                report.templates_seeded = write_embedded::<EmbeddedTemplates>(dir)?;
            }
        }

        if let Some(ref path) = self.config_file {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                if let Some(data) = EmbeddedConfig::get("config.yaml") {
                    fs::write(path, &*data.data)?;
                    report.config_seeded = true;
                    tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                }
            }
        }

        Ok(report)
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths (or defaults if not set).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Fonts => {
                    let dir = self
                        .fonts_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./fonts"));
                    extract_embedded::<EmbeddedFonts>(&dir, force, &mut report)?;
                }
                AssetCategory::Templates => {
                    let dir = self
                        .templates_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./templates"));
                    extract_embedded::<EmbeddedTemplates>(&dir, force, &mut report)?;
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    if let Some(data) = EmbeddedConfig::get("config.yaml") {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Fonts => EmbeddedFonts::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Templates => EmbeddedTemplates::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}

/// Write every embedded file of `E` into `dir`, returning the names written
fn write_embedded<E: RustEmbed>(dir: &Path) -> io::Result<Vec<String>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for file in E::iter() {
        if let Some(data) = E::get(&file) {
            fs::write(dir.join(file.as_ref()), &*data.data)?;
            written.push(file.to_string());
        }
    }
    if !written.is_empty() {
        tracing::info!(
            dir = %dir.display(),
            count = written.len(),
            "Seeded directory with embedded assets"
        );
    }
    Ok(written)
}

fn extract_embedded<E: RustEmbed>(
    dir: &Path,
    force: bool,
    report: &mut InitReport,
) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for file in E::iter() {
        let path = dir.join(file.as_ref());
        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            continue;
        }
        if let Some(data) = E::get(&file) {
            fs::write(&path, &*data.data)?;
            report.written.push(path.display().to_string());
        }
    }
    Ok(())
}
