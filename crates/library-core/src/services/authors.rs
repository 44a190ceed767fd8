use tracing::info;

use crate::domain::{Author, AuthorProfile};
use crate::error::LibraryError;
use crate::ids::{AuthorId, EntityKind, SequentialIds};
use crate::store::Registry;
use crate::validation;

#[derive(Debug)]
pub struct AuthorService {
    authors: Registry<Author>,
    ids: SequentialIds,
}

impl Default for AuthorService {
    fn default() -> Self {
        Self {
            authors: Registry::new(),
            ids: SequentialIds::new(EntityKind::Author),
        }
    }
}

impl AuthorService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, profile: AuthorProfile) -> Result<&Author, LibraryError> {
        validate_names(&profile)?;

        let mut author = Author::new(self.ids.next_id(), "", "");
        author.apply(profile);
        let stored = self.authors.insert(author).map_err(|existing| {
            LibraryError::invalid(format!("Author already exists: {}", existing.author_id))
        })?;

        info!(author_id = %stored.author_id, name = %stored.full_name(), "author added");
        Ok(stored)
    }

    pub fn find(&self, author_id: &AuthorId) -> Result<&Author, LibraryError> {
        self.authors
            .get(author_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Author, author_id.as_str()))
    }

    /// Matches the query against first or last name, ignoring case. A blank
    /// query matches nothing.
    pub fn search_by_name(&self, query: &str) -> Vec<&Author> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.authors
            .iter()
            .filter(|author| author.name_contains(&needle))
            .collect()
    }

    pub fn active(&self) -> Vec<&Author> {
        self.authors.iter().filter(|author| author.active).collect()
    }

    pub fn update(
        &mut self,
        author_id: &AuthorId,
        profile: AuthorProfile,
    ) -> Result<&Author, LibraryError> {
        validate_names(&profile)?;
        let author = self
            .authors
            .get_mut(author_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Author, author_id.as_str()))?;
        author.apply(profile);

        info!(%author_id, "author updated");
        Ok(author)
    }

    pub fn deactivate(&mut self, author_id: &AuthorId) -> Result<&Author, LibraryError> {
        let author = self
            .authors
            .get_mut(author_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Author, author_id.as_str()))?;
        author.active = false;

        info!(%author_id, "author deactivated");
        Ok(author)
    }

    pub fn all(&self) -> Vec<&Author> {
        self.authors.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn total_active(&self) -> usize {
        self.authors.iter().filter(|author| author.active).count()
    }
}

fn validate_names(profile: &AuthorProfile) -> Result<(), LibraryError> {
    validation::validate_not_empty(&profile.first_name, "First name")?;
    validation::validate_not_empty(&profile.last_name, "Last name")
}
