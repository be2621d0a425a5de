//! Test fixtures and constants.

use serde_json::{json, Value};

/// Track ids known to the mock content API
pub mod ids {
    /// Well-formed record: episode 12, title "Test"
    pub const EPISODE_12: &str = "ep-12";

    /// Record with markup in the title
    pub const MARKUP: &str = "ep-markup";

    /// Record without an episode number
    pub const NO_EPISODE: &str = "ep-no-number";

    /// Record without a title
    pub const NO_TITLE: &str = "ep-no-title";

    /// Body that is not JSON
    pub const NOT_JSON: &str = "ep-garbage";

    /// Unknown to the content API (404)
    pub const UNKNOWN: &str = "ep-unknown";

    /// Responds slower than the client timeout
    pub const SLOW: &str = "ep-slow";
}

/// Path prefix the mock content API serves records under
pub const TRACKS_PATH: &str = "/api/tracks";

pub fn episode_12() -> Value {
    json!({
        "episode": 12,
        "title": "Test",
        "duration": 2712,
        "published": "2024-03-01"
    })
}

pub fn markup_record() -> Value {
    json!({ "episode": 3, "title": "Traits & <Generics> \"explained\"" })
}

pub fn record_without_episode() -> Value {
    json!({ "title": "Nameless" })
}

pub fn record_without_title() -> Value {
    json!({ "episode": 99 })
}
