//! Mock content API for record-driven covers.

use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use super::fixtures::{self, ids, TRACKS_PATH};

/// Wrapper around wiremock MockServer serving track records
pub struct MockContentApi {
    pub server: MockServer,
}

impl MockContentApi {
    /// Start a mock content API with the standard fixture records mounted
    pub async fn start() -> Self {
        let api = Self {
            server: MockServer::start().await,
        };

        api.mock_record(ids::EPISODE_12, fixtures::episode_12()).await;
        api.mock_record(ids::MARKUP, fixtures::markup_record()).await;
        api.mock_record(ids::NO_EPISODE, fixtures::record_without_episode())
            .await;
        api.mock_record(ids::NO_TITLE, fixtures::record_without_title())
            .await;
        api.mock_raw(ids::NOT_JSON, 200, "<html>oops</html>").await;
        api.mock_raw(ids::UNKNOWN, 404, r#"{"error":"not found"}"#).await;

        Mock::given(method("GET"))
            .and(path(format!("{TRACKS_PATH}/{}", ids::SLOW)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::episode_12())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&api.server)
            .await;

        api
    }

    /// Base URL to configure as `content_api.base_url`
    pub fn base_url(&self) -> String {
        format!("{}{}", self.server.uri(), TRACKS_PATH)
    }

    /// Serve a JSON record for `id`
    pub async fn mock_record(&self, id: &str, record: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("{TRACKS_PATH}/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(record)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve a raw body with the given status for `id`
    pub async fn mock_raw(&self, id: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{TRACKS_PATH}/{id}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the mock has received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}
