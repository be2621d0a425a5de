//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use episode_art::assets::AssetLoader;
use episode_art::models::AppConfig;
use episode_art::server::{build_router, create_app_state_with, AppState};
use episode_art::services::{AssetFontSource, FontSource, HttpTrackSource};

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Test app whose content API points nowhere useful
    pub fn new() -> Self {
        Self::with_content_api("http://127.0.0.1:9/tracks")
    }

    /// Test app fetching records from `base_url`
    pub fn with_content_api(base_url: &str) -> Self {
        let loader = Arc::new(AssetLoader::new(None, None, None));
        let font_source = Arc::new(AssetFontSource::new(loader));
        Self::build(test_config(base_url), font_source)
    }

    /// Test app with a custom font source
    pub fn with_font_source(base_url: &str, font_source: Arc<dyn FontSource>) -> Self {
        Self::build(test_config(base_url), font_source)
    }

    /// Test app with a fully custom config
    pub fn with_config(config: AppConfig) -> Self {
        let loader = Arc::new(AssetLoader::new(None, None, None));
        Self::build(config, Arc::new(AssetFontSource::new(loader)))
    }

    /// Test app with a custom config and font source
    pub fn with_config_and_fonts(config: AppConfig, font_source: Arc<dyn FontSource>) -> Self {
        Self::build(config, font_source)
    }

    fn build(config: AppConfig, font_source: Arc<dyn FontSource>) -> Self {
        let loader = AssetLoader::new(None, None, None);
        let tracks = Arc::new(
            HttpTrackSource::new(&config.content_api).expect("Failed to create track source"),
        );
        let state = create_app_state_with(Arc::new(config), &loader, tracks, font_source)
            .expect("Failed to create app state");
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Default config with a test content API, bundled fonts only
pub fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.content_api.base_url = base_url.to_string();
    config.content_api.timeout_secs = 2;
    config.render.system_fonts = false;
    config
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the PNG body into RGBA8 rows
    pub fn rgba(&self) -> Rgba {
        let mut reader = png::Decoder::new(&self.body[..])
            .read_info()
            .expect("Failed to read PNG header");
        let mut data = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut data).expect("Failed to decode PNG");
        assert_eq!(info.color_type, png::ColorType::Rgba);
        data.truncate(info.buffer_size());

        Rgba {
            width: info.width,
            height: info.height,
            data,
        }
    }

    /// Width and height from the PNG IHDR chunk
    pub fn png_dimensions(&self) -> Option<(u32, u32)> {
        if !self.is_png() || self.body.len() < 24 {
            return None;
        }
        let b = &self.body;
        Some((
            u32::from_be_bytes([b[16], b[17], b[18], b[19]]),
            u32::from_be_bytes([b[20], b[21], b[22], b[23]]),
        ))
    }
}

/// Decoded cover pixels
pub struct Rgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Rgba {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Count foreground-dark pixels in the half-open box `[x0, x1) x [y0, y1)`
    pub fn dark_pixels(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
        let mut count = 0;
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let [r, g, b, _] = self.pixel(x, y);
                if u32::from(r) + u32::from(g) + u32::from(b) < 3 * 128 {
                    count += 1;
                }
            }
        }
        count
    }
}
