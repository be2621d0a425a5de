use crate::rendering::DEFAULT_DIMENSIONS;

/// Title used by the title-only cover when none is given.
pub const DEFAULT_TITLE: &str = "My Default Title";

/// A parsed cover request. Built fresh for every HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub episode_id: Option<String>,
}

impl RenderRequest {
    /// Title-only cover: independent width and height.
    pub fn for_title(
        width: Option<&str>,
        height: Option<&str>,
        title: Option<&str>,
        max_dimensions: u32,
    ) -> Self {
        Self {
            width: parse_dimension(width, max_dimensions),
            height: parse_dimension(height, max_dimensions),
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            episode_id: None,
        }
    }

    /// Record-driven cover: a square `size` canvas; the title comes from the record.
    pub fn for_episode(id: Option<&str>, size: Option<&str>, max_dimensions: u32) -> Self {
        let side = parse_dimension(size, max_dimensions);
        Self {
            width: side,
            height: side,
            title: String::new(),
            episode_id: id.map(str::to_string),
        }
    }

    /// Side length of the square canvas
    pub fn dimensions(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// Parse a raw pixel value, falling back to the default.
///
/// Absent, non-numeric, zero and oversized values all yield
/// [`DEFAULT_DIMENSIONS`]; bad input never becomes an error.
pub fn parse_dimension(raw: Option<&str>, max_dimensions: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&v| v > 0 && v <= max_dimensions)
        .unwrap_or(DEFAULT_DIMENSIONS)
}
