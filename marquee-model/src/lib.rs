//! Core data model definitions shared across Marquee crates.
//!
//! Every type here mirrors a payload returned by the TMDB-shaped catalog
//! provider, plus the composite [`Movie`] record that the aggregation core
//! assembles from several of them.
#![allow(missing_docs)]

pub mod credits;
pub mod dates;
pub mod ids;
pub mod movie;
pub mod page;
pub mod video;

pub use credits::{CastMember, Credits, CrewMember, PersonExternalIds};
pub use ids::{MovieId, PersonId, ZeroId};
pub use movie::{Genre, Movie, MovieSummary};
pub use page::{Page, SimilarList};
pub use video::{VideoKind, VideoList, VideoReference};
