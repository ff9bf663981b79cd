use serde::{Deserialize, Serialize};

use crate::movie::MovieSummary;

/// One page of a provider list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> Page<T> {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty(first_page())
    }
}

fn first_page() -> u32 {
    1
}

/// `/movie/{id}/similar` payload, attached to [`crate::Movie`] unchanged.
pub type SimilarList = Page<MovieSummary>;
