//! Provider resource paths, relative to the configured base URL.

use marquee_model::{MovieId, PersonId};

pub const POPULAR_MOVIES: &str = "/movie/popular";
pub const SEARCH_MOVIES: &str = "/search/movie";

pub fn movie(id: MovieId) -> String {
    format!("/movie/{id}")
}

pub fn movie_credits(id: MovieId) -> String {
    format!("/movie/{id}/credits")
}

pub fn movie_videos(id: MovieId) -> String {
    format!("/movie/{id}/videos")
}

pub fn movie_similar(id: MovieId) -> String {
    format!("/movie/{id}/similar")
}

pub fn person_external_ids(id: PersonId) -> String {
    format!("/person/{id}/external_ids")
}
