use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::RenderFailure;
use crate::models::{ContentApiConfig, TrackRecord};

/// Characters escaped when an id is appended as a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Lookup of track records by id
#[async_trait]
pub trait TrackSource: Send + Sync {
    async fn fetch_track(&self, id: &str) -> Result<TrackRecord, RenderFailure>;
}

/// Fetches `<base_url>/<id>` from the content API.
pub struct HttpTrackSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTrackSource {
    pub fn new(config: &ContentApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("episode-art/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn track_url(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }
}

#[async_trait]
impl TrackSource for HttpTrackSource {
    async fn fetch_track(&self, id: &str) -> Result<TrackRecord, RenderFailure> {
        let url = self.track_url(id);
        tracing::debug!(url = %url, "Fetching track record");

        let response = self.client.get(&url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderFailure::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await.map_err(fetch_error)?;
        let record: TrackRecord = serde_json::from_str(&body)?;

        tracing::debug!(
            episode = record.episode,
            title = %record.title,
            "Track record fetched"
        );

        Ok(record)
    }
}

fn fetch_error(e: reqwest::Error) -> RenderFailure {
    if e.is_timeout() {
        RenderFailure::Timeout("fetching track record")
    } else {
        RenderFailure::Fetch(e)
    }
}
