use serde::{Deserialize, Serialize};

use crate::ids::{MovieId, PersonId};

/// Cast and crew of a film, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    pub fn member_count(&self) -> usize {
        self.cast.len() + self.crew.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Raw provider id; `None` when the payload carried `null`.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub credit_id: Option<String>,
    #[serde(default)]
    pub cast_id: Option<u64>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: Option<f32>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub credit_id: Option<String>,
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: Option<f32>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

/// Shared view over cast and crew entries for identifier enrichment.
pub trait CreditedPerson {
    fn person_id(&self) -> Option<PersonId>;

    fn imdb_id(&self) -> Option<&str>;

    fn imdb_id_slot(&mut self) -> &mut Option<String>;

    /// Stores the external id unless one is already present.
    ///
    /// Returns `false` when the slot was already filled; the existing value
    /// is kept.
    fn record_imdb_id(&mut self, value: String) -> bool {
        let slot = self.imdb_id_slot();
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }
}

impl CreditedPerson for CastMember {
    fn person_id(&self) -> Option<PersonId> {
        self.id.and_then(PersonId::new)
    }

    fn imdb_id(&self) -> Option<&str> {
        self.imdb_id.as_deref()
    }

    fn imdb_id_slot(&mut self) -> &mut Option<String> {
        &mut self.imdb_id
    }
}

impl CreditedPerson for CrewMember {
    fn person_id(&self) -> Option<PersonId> {
        self.id.and_then(PersonId::new)
    }

    fn imdb_id(&self) -> Option<&str> {
        self.imdb_id.as_deref()
    }

    fn imdb_id_slot(&mut self) -> &mut Option<String> {
        &mut self.imdb_id
    }
}

/// `/person/{id}/external_ids` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonExternalIds {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub facebook_id: Option<String>,
    #[serde(default)]
    pub instagram_id: Option<String>,
    #[serde(default)]
    pub twitter_id: Option<String>,
    #[serde(default)]
    pub wikidata_id: Option<String>,
    #[serde(default)]
    pub tiktok_id: Option<String>,
    #[serde(default)]
    pub youtube_id: Option<String>,
}

impl PersonExternalIds {
    /// IMDb id with blank values treated as missing.
    pub fn imdb(&self) -> Option<&str> {
        self.imdb_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
