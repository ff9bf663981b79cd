use serde::{Deserialize, Serialize};

use crate::ids::MovieId;

const YOUTUBE_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// Coarse classification of a provider video entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoKind {
    Trailer,
    Teaser,
    Other,
}

impl VideoKind {
    /// Case-insensitive mapping of the provider's `type` field.
    pub fn from_provider(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("trailer") {
            VideoKind::Trailer
        } else if raw.eq_ignore_ascii_case("teaser") {
            VideoKind::Teaser
        } else {
            VideoKind::Other
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoReference {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub official: Option<bool>,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub iso_3166_1: Option<String>,
}

impl VideoReference {
    pub fn kind(&self) -> VideoKind {
        VideoKind::from_provider(&self.video_type)
    }

    pub fn is_hosted_on(&self, site: &str) -> bool {
        self.site.trim().eq_ignore_ascii_case(site.trim())
    }

    /// Public watch URL, only known for YouTube-hosted entries.
    pub fn watch_url(&self) -> Option<String> {
        if self.key.is_empty() || !self.is_hosted_on("YouTube") {
            return None;
        }
        Some(format!("{YOUTUBE_WATCH_BASE}{}", self.key))
    }
}

/// `/movie/{id}/videos` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub results: Vec<VideoReference>,
}
