use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::domain::{Book, BookCategory, BookUpdate};
use crate::error::LibraryError;
use crate::ids::EntityKind;
use crate::store::Registry;
use crate::validation;

/// Owns the book registry and the copy counts of every title.
#[derive(Debug)]
pub struct CatalogService {
    books: Registry<Book>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            books: Registry::new(),
            clock,
        }
    }

    pub fn add(&mut self, mut book: Book) -> Result<&Book, LibraryError> {
        validation::validate_isbn(&book.isbn)?;
        self.validate_details(
            &book.title,
            &book.author,
            book.publication_year,
            book.total_copies,
        )?;
        book.restock();

        match self.books.insert(book) {
            Ok(stored) => {
                info!(
                    isbn = %stored.isbn,
                    title = %stored.title,
                    copies = stored.total_copies,
                    "book added"
                );
                Ok(stored)
            }
            Err(rejected) => {
                debug!(isbn = %rejected.isbn, "duplicate isbn rejected");
                Err(LibraryError::invalid(format!(
                    "Book already exists with ISBN: {}",
                    rejected.isbn
                )))
            }
        }
    }

    pub fn find(&self, isbn: &str) -> Result<&Book, LibraryError> {
        self.books
            .get(isbn)
            .ok_or_else(|| LibraryError::not_found(EntityKind::Book, isbn))
    }

    pub(crate) fn find_mut(&mut self, isbn: &str) -> Result<&mut Book, LibraryError> {
        self.books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::not_found(EntityKind::Book, isbn))
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.books.contains(isbn)
    }

    /// Case-insensitive substring match on the title. A blank query matches
    /// nothing.
    pub fn search_by_title(&self, query: &str) -> Vec<&Book> {
        self.search(query, |book| book.title.as_str())
    }

    pub fn search_by_author(&self, query: &str) -> Vec<&Book> {
        self.search(query, |book| book.author.as_str())
    }

    fn search<'a>(&'a self, query: &str, field: impl Fn(&'a Book) -> &'a str) -> Vec<&'a Book> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.books
            .iter()
            .filter(|book| field(*book).to_lowercase().contains(&needle))
            .collect()
    }

    pub fn by_category(&self, category: BookCategory) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.category == category)
            .collect()
    }

    pub fn available(&self) -> Vec<&Book> {
        self.books.iter().filter(|book| book.is_available()).collect()
    }

    pub fn all(&self) -> Vec<&Book> {
        self.books.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Replaces the descriptive fields of a title. Changing the copy count
    /// shifts the available count by the same amount.
    pub fn update(&mut self, isbn: &str, update: BookUpdate) -> Result<&Book, LibraryError> {
        if !self.books.contains(isbn) {
            return Err(LibraryError::not_found(EntityKind::Book, isbn));
        }
        self.validate_details(
            &update.title,
            &update.author,
            update.publication_year,
            update.total_copies,
        )?;

        let book = self.find_mut(isbn)?;
        book.resize(update.total_copies).map_err(|on_loan| {
            LibraryError::invalid(format!(
                "Total copies cannot drop below the {on_loan} copies on loan"
            ))
        })?;
        book.title = update.title;
        book.author = update.author;
        book.publisher = update.publisher;
        book.publication_year = update.publication_year;
        book.category = update.category;

        info!(%isbn, copies = book.total_copies, "book updated");
        Ok(book)
    }

    pub fn remove(&mut self, isbn: &str) -> Result<Book, LibraryError> {
        let removed = self
            .books
            .remove(isbn)
            .ok_or_else(|| LibraryError::not_found(EntityKind::Book, isbn))?;
        info!(%isbn, "book removed");
        Ok(removed)
    }

    fn validate_details(
        &self,
        title: &str,
        author: &str,
        publication_year: i32,
        total_copies: u32,
    ) -> Result<(), LibraryError> {
        validation::validate_not_empty(title, "Title")?;
        validation::validate_not_empty(author, "Author")?;
        validation::validate_positive(i64::from(total_copies), "Total copies")?;
        validation::validate_year(publication_year, self.clock.today().year())
    }
}
