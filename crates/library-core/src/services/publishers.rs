use tracing::info;

use crate::domain::{Publisher, PublisherProfile};
use crate::error::LibraryError;
use crate::ids::{EntityKind, PublisherId, SequentialIds};
use crate::store::Registry;
use crate::validation;

#[derive(Debug)]
pub struct PublisherService {
    publishers: Registry<Publisher>,
    ids: SequentialIds,
}

impl Default for PublisherService {
    fn default() -> Self {
        Self {
            publishers: Registry::new(),
            ids: SequentialIds::new(EntityKind::Publisher),
        }
    }
}

impl PublisherService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, profile: PublisherProfile) -> Result<&Publisher, LibraryError> {
        validate_profile(&profile)?;

        let mut publisher = Publisher::new(self.ids.next_id(), "", "");
        publisher.apply(profile);
        let stored = self.publishers.insert(publisher).map_err(|existing| {
            LibraryError::invalid(format!(
                "Publisher already exists: {}",
                existing.publisher_id
            ))
        })?;

        info!(publisher_id = %stored.publisher_id, name = %stored.name, "publisher added");
        Ok(stored)
    }

    pub fn find(&self, publisher_id: &PublisherId) -> Result<&Publisher, LibraryError> {
        self.publishers
            .get(publisher_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Publisher, publisher_id.as_str()))
    }

    pub fn search_by_name(&self, query: &str) -> Vec<&Publisher> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.publishers
            .iter()
            .filter(|publisher| publisher.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn by_country(&self, country: &str) -> Vec<&Publisher> {
        self.publishers
            .iter()
            .filter(|publisher| publisher.country.eq_ignore_ascii_case(country.trim()))
            .collect()
    }

    pub fn active(&self) -> Vec<&Publisher> {
        self.publishers
            .iter()
            .filter(|publisher| publisher.active)
            .collect()
    }

    pub fn update(
        &mut self,
        publisher_id: &PublisherId,
        profile: PublisherProfile,
    ) -> Result<&Publisher, LibraryError> {
        validate_profile(&profile)?;
        let publisher = self
            .publishers
            .get_mut(publisher_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Publisher, publisher_id.as_str()))?;
        publisher.apply(profile);

        info!(%publisher_id, "publisher updated");
        Ok(publisher)
    }

    pub fn deactivate(&mut self, publisher_id: &PublisherId) -> Result<&Publisher, LibraryError> {
        let publisher = self
            .publishers
            .get_mut(publisher_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Publisher, publisher_id.as_str()))?;
        publisher.active = false;

        info!(%publisher_id, "publisher deactivated");
        Ok(publisher)
    }

    pub fn all(&self) -> Vec<&Publisher> {
        self.publishers.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    pub fn total_active(&self) -> usize {
        self.publishers
            .iter()
            .filter(|publisher| publisher.active)
            .count()
    }
}

/// Contact fields are optional, but an e-mail that is present must be well
/// formed.
fn validate_profile(profile: &PublisherProfile) -> Result<(), LibraryError> {
    validation::validate_not_empty(&profile.name, "Publisher name")?;
    validation::validate_not_empty(&profile.country, "Country")?;
    if let Some(email) = profile.email.as_deref() {
        validation::validate_email(email)?;
    }
    Ok(())
}
