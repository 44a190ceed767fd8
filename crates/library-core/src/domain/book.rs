use crate::store::Keyed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookCategory {
    Fiction,
    NonFiction,
    Science,
    Technology,
    History,
    Biography,
    Children,
    Reference,
}

impl BookCategory {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Fiction,
            Self::NonFiction,
            Self::Science,
            Self::Technology,
            Self::History,
            Self::Biography,
            Self::Children,
            Self::Reference,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
            Self::Science => "Science",
            Self::Technology => "Technology",
            Self::History => "History",
            Self::Biography => "Biography",
            Self::Children => "Children",
            Self::Reference => "Reference",
        }
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BookCategory {
    type Err = String;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ordered()
            .into_iter()
            .find(|category| {
                category
                    .label()
                    .chars()
                    .filter(|c| *c != '-')
                    .flat_map(char::to_lowercase)
                    .eq(normalized.chars())
            })
            .ok_or_else(|| format!("Unknown book category: {s}"))
    }
}

/// A catalogued title and its copy counts.
///
/// `available_copies` is only moved through [`Book::borrow_copy`],
/// [`Book::return_copy`] and [`Book::resize`], which keep it within
/// `0..=total_copies`.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: i32,
    pub total_copies: u32,
    available_copies: u32,
    pub category: BookCategory,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        publisher: impl Into<String>,
        publication_year: i32,
        total_copies: u32,
        category: BookCategory,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            publisher: publisher.into(),
            publication_year,
            total_copies,
            available_copies: total_copies,
            category,
        }
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    pub fn copies_on_loan(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Takes one copy off the shelf. Returns `false` when none was left.
    pub fn borrow_copy(&mut self) -> bool {
        if self.available_copies == 0 {
            return false;
        }
        self.available_copies -= 1;
        true
    }

    /// Puts one copy back. Returns `false` when every copy was already shelved.
    pub fn return_copy(&mut self) -> bool {
        if self.available_copies >= self.total_copies {
            return false;
        }
        self.available_copies += 1;
        true
    }

    /// Shelves every owned copy. Catalogue entries start with nothing on loan.
    pub(crate) fn restock(&mut self) {
        self.available_copies = self.total_copies;
    }

    /// Changes the number of owned copies while keeping every copy on loan
    /// accounted for. Fails when fewer copies than are on loan would remain.
    pub(crate) fn resize(&mut self, total_copies: u32) -> Result<(), u32> {
        let on_loan = self.copies_on_loan();
        if total_copies < on_loan {
            return Err(on_loan);
        }
        self.total_copies = total_copies;
        self.available_copies = total_copies - on_loan;
        Ok(())
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.isbn == other.isbn
    }
}

impl Eq for Book {}

impl Keyed for Book {
    fn key(&self) -> &str {
        &self.isbn
    }
}

/// Payload for cataloguing a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    pub publication_year: i32,
    pub total_copies: u32,
    pub category: BookCategory,
}

impl From<NewBook> for Book {
    fn from(value: NewBook) -> Self {
        Book::new(
            value.isbn,
            value.title,
            value.author,
            value.publisher,
            value.publication_year,
            value.total_copies,
            value.category,
        )
    }
}

/// Replacement descriptive fields for an existing title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    pub publication_year: i32,
    pub total_copies: u32,
    pub category: BookCategory,
}
