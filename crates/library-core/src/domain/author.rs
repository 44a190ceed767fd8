use crate::ids::AuthorId;
use crate::store::Keyed;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub author_id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
    pub active: bool,
}

impl Author {
    pub fn new(
        author_id: AuthorId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            author_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: None,
            nationality: None,
            biography: None,
            active: true,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match against either name. `needle` must already be
    /// lowercase.
    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
    }

    pub(crate) fn apply(&mut self, profile: AuthorProfile) {
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.birth_date = profile.birth_date;
        self.nationality = profile.nationality;
        self.biography = profile.biography;
    }
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.author_id == other.author_id
    }
}

impl Keyed for Author {
    fn key(&self) -> &str {
        self.author_id.as_str()
    }
}

/// Descriptive fields accepted on creation and on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
}

impl AuthorProfile {
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }
}
