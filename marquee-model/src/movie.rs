use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    credits::Credits,
    dates::deserialize_optional_date,
    ids::MovieId,
    page::SimilarList,
    video::VideoReference,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// The composite film record.
///
/// Scalar fields come from `/movie/{id}`. The enrichment fields are never
/// part of that payload; the aggregation core attaches each of them at most
/// once after its own upstream call succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub imdb_id: Option<String>,

    // Enrichments are attached after the base fetch, never decoded from it.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub similar: Option<SimilarList>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<VideoReference>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
}

impl Movie {
    pub fn attach_credits(&mut self, credits: Credits) {
        debug_assert!(self.credits.is_none(), "credits attached twice");
        self.credits = Some(credits);
    }

    pub fn attach_similar(&mut self, similar: SimilarList) {
        debug_assert!(self.similar.is_none(), "similar attached twice");
        self.similar = Some(similar);
    }

    pub fn attach_trailer(&mut self, trailer: VideoReference) {
        debug_assert!(self.trailer.is_none(), "trailer attached twice");
        self.trailer_url = trailer.watch_url();
        self.trailer = Some(trailer);
    }
}

/// Lightweight list entry used by popular/search/similar pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub popularity: Option<f32>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
}

impl MovieSummary {
    /// Records the watch URL of `trailer`, if it has one.
    pub fn attach_trailer(&mut self, trailer: &VideoReference) {
        self.trailer_url = trailer.watch_url();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    #[test]
    fn base_record_leaves_enrichments_empty() {
        let raw = r#"{
            "id": 603,
            "title": "The Matrix",
            "overview": "Set in the 22nd century...",
            "release_date": "1999-03-31",
            "vote_average": 8.2,
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}],
            "imdb_id": "tt0133093"
        }"#;

        let movie: Movie = serde_json::from_str(raw).unwrap();

        assert_eq!(movie.id.get(), 603);
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(1999, 3, 31));
        assert!(movie.credits.is_none());
        assert!(movie.similar.is_none());
        assert!(movie.trailer.is_none());
    }

    #[test]
    fn appended_enrichments_in_base_payload_are_ignored() {
        let raw = r#"{
            "id": 603,
            "title": "The Matrix",
            "credits": {"id": 603, "cast": [], "crew": []},
            "similar": {"page": 1, "results": []},
            "trailer_url": "https://example.com/x"
        }"#;

        let mut movie: Movie = serde_json::from_str(raw).unwrap();

        assert!(movie.credits.is_none());
        assert!(movie.similar.is_none());
        assert!(movie.trailer_url.is_none());

        movie.attach_credits(Credits::default());
        assert!(movie.credits.is_some());
    }

    #[test]
    fn empty_release_date_is_absent() {
        let raw = r#"{"id": 1, "title": "Untitled", "release_date": ""}"#;
        let movie: Movie = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.release_date, None);
    }

    #[test]
    fn similar_page_defaults_missing_counters() {
        let raw = r#"{"results": [{"id": 604, "title": "The Matrix Reloaded"}]}"#;
        let page: Page<MovieSummary> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.results[0].id.get(), 604);
    }
}
