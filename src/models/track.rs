use serde::Deserialize;

/// Track record from the content API.
///
/// Only `episode` and `title` are read. Both are required: a record missing
/// either fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackRecord {
    pub episode: i64,
    pub title: String,
}
