use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use episode_art::api;
use episode_art::assets::{AssetCategory, AssetLoader};
use episode_art::models::{RenderRequest, DEFAULT_TITLE};
use episode_art::rendering::{LayoutResolver, DEFAULT_DIMENSIONS};
use episode_art::server;

#[derive(Parser)]
#[command(name = "episode-art")]
#[command(about = "Episode Art - dynamic podcast cover-art rendering server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a cover directly to a PNG file
    Render {
        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Track record id to fetch from the content API
        #[arg(long, conflicts_with = "episode")]
        id: Option<String>,

        /// Episode number (renders the full cover without fetching a record)
        #[arg(short, long)]
        episode: Option<i64>,

        /// Title text (ignored with --id)
        #[arg(short, long)]
        title: Option<String>,

        /// Side length in pixels
        #[arg(short, long, default_value_t = DEFAULT_DIMENSIONS)]
        size: u32,

        /// Layout variant from config.yaml (e.g. "plain", "ruled", "rotated")
        #[arg(long)]
        variant: Option<String>,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract font files
        #[arg(long)]
        fonts: bool,

        /// Extract the cover SVG template
        #[arg(long)]
        templates: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Episode Art API",
        description = "Dynamic podcast cover-art rendering",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(api::handle_title_art, api::handle_album_art),
    tags(
        (name = "Cover", description = "Cover image rendering")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            output,
            id,
            episode,
            title,
            size,
            variant,
        }) => run_render_command(&output, id, episode, title, size, variant).await,
        Some(Commands::Init {
            fonts,
            templates,
            config,
            all,
            force,
            list,
        }) => run_init_command(fonts, templates, config, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str, with_time: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    if with_time {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

/// Render a cover directly to a PNG file (no server needed)
async fn run_render_command(
    output: &PathBuf,
    id: Option<String>,
    episode: Option<i64>,
    title: Option<String>,
    size: u32,
    variant: Option<String>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    init_tracing("episode_art=warn", false);

    let asset_loader = Arc::new(AssetLoader::from_env());
    let state = server::create_app_state(asset_loader)?;
    let pipeline = state.pipeline;

    let size = size.to_string();
    let size = size.as_str();
    let max = pipeline.config().render.max_dimensions;

    let tree = match (id, episode) {
        (Some(id), _) => {
            let request = RenderRequest::for_episode(Some(id.as_str()), Some(size), max);
            pipeline
                .compose_episode(&request, variant.as_deref())
                .await
                .map_err(|e| anyhow::anyhow!("Compose error: {e}"))?
        }
        (None, Some(episode)) => {
            let request = RenderRequest::for_title(Some(size), Some(size), title.as_deref(), max);
            let config = pipeline.config();
            LayoutResolver::new(
                config.layout_style(variant.as_deref()),
                config.wordmark.clone(),
            )
            .resolve(request.dimensions(), episode, &request.title)
        }
        (None, None) => {
            let request = RenderRequest::for_title(Some(size), Some(size), title.as_deref(), max);
            pipeline.compose_title(&request)
        }
    };

    let png_bytes = pipeline
        .render(tree)
        .await
        .map_err(|e| anyhow::anyhow!("Render error: {e}"))?;

    std::fs::write(output, &png_bytes)?;
    println!("Rendered {} ({} bytes)", output.display(), png_bytes.len());

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    fonts: bool,
    templates: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Fonts:");
        for f in AssetLoader::list_embedded(AssetCategory::Fonts) {
            println!("  {f}");
        }
        println!("\nTemplates:");
        for f in AssetLoader::list_embedded(AssetCategory::Templates) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || fonts {
        categories.push(AssetCategory::Fonts);
    }
    if all || templates {
        categories.push(AssetCategory::Templates);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --fonts, --templates, or --config");
        eprintln!("\nRun 'episode-art init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let report = AssetLoader::from_env().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let env_or = |name: &str, fallback: &str| {
        std::env::var(name).unwrap_or_else(|_| fallback.to_string())
    };

    println!("Episode Art v{VERSION}");
    println!("Dynamic podcast cover-art rendering server\n");

    println!("Environment Variables:");
    println!("  BIND_ADDR       = {}", env_or("BIND_ADDR", "0.0.0.0:3000 (default)"));
    println!("  CONFIG_FILE     = {}", env_or("CONFIG_FILE", "(not set)"));
    println!("  FONTS_DIR       = {}", env_or("FONTS_DIR", "(not set)"));
    println!("  TEMPLATES_DIR   = {}", env_or("TEMPLATES_DIR", "(not set)"));
    println!("  CONTENT_API_URL = {}", env_or("CONTENT_API_URL", "(not set)"));

    let loader = AssetLoader::from_env();

    println!("\nAsset Sources:");
    let source = |path: Option<&std::path::Path>| match path {
        Some(p) if p.exists() => p.display().to_string(),
        Some(_) => "embedded (path not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:    {}", source(loader.config_file()));
    println!("  Templates: {}", source(loader.templates_dir()));
    println!(
        "  Fonts:     {} ({} embedded)",
        source(loader.fonts_dir()),
        AssetLoader::list_embedded(AssetCategory::Fonts).len()
    );

    println!("\nCommands:");
    println!("  episode-art serve    Start the HTTP server");
    println!("  episode-art render   Render a cover to a PNG file");
    println!("  episode-art init     Extract embedded assets");
    println!("\nDefault title: {DEFAULT_TITLE:?}");
    println!("\nRun 'episode-art --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    init_tracing("episode_art=debug,tower_http=debug", true);

    let asset_loader = Arc::new(AssetLoader::from_env());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let describe = |path: Option<&std::path::Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    };
    tracing::info!(
        fonts = %describe(asset_loader.fonts_dir()),
        templates = %describe(asset_loader.templates_dir()),
        config = %describe(asset_loader.config_file()),
        "Asset sources configured"
    );

    // Seed if configured paths are empty
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                fonts = report.fonts_seeded.len(),
                templates = report.templates_seeded.len(),
                config = report.config_seeded,
                "Seeded empty directories with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    // Fonts load once, in the background, before the first request needs them
    state.fonts.warm();

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Episode Art server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
