use crate::ids::PublisherId;
use crate::store::Keyed;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Publisher {
    pub publisher_id: PublisherId,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub country: String,
    pub active: bool,
}

impl Publisher {
    pub fn new(
        publisher_id: PublisherId,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            publisher_id,
            name: name.into(),
            address: None,
            phone: None,
            email: None,
            website: None,
            country: country.into(),
            active: true,
        }
    }

    pub(crate) fn apply(&mut self, profile: PublisherProfile) {
        self.name = profile.name;
        self.country = profile.country;
        self.address = profile.address;
        self.phone = profile.phone;
        self.email = profile.email;
        self.website = profile.website;
    }
}

impl PartialEq for Publisher {
    fn eq(&self, other: &Self) -> bool {
        self.publisher_id == other.publisher_id
    }
}

impl Keyed for Publisher {
    fn key(&self) -> &str {
        self.publisher_id.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherProfile {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl PublisherProfile {
    pub fn named(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            ..Self::default()
        }
    }
}
