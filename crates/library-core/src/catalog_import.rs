//! Bulk catalogue loading from CSV exports.
//!
//! Expected header: `ISBN,Title,Author,Publisher,Year,Copies,Category`.
//! Every row goes through [`LibraryService::add_book`], so the usual
//! validation applies. The first bad row stops the import; rows before it stay
//! catalogued.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Book, BookCategory};
use crate::error::LibraryError;
use crate::services::LibraryService;

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "ISBN")]
    isbn: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Author")]
    author: String,
    #[serde(rename = "Publisher", default)]
    publisher: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Copies")]
    copies: u32,
    #[serde(rename = "Category")]
    category: String,
}

impl CatalogRow {
    fn into_book(self) -> Result<Book, String> {
        let category = self.category.parse::<BookCategory>()?;
        Ok(Book::new(
            self.isbn,
            self.title,
            self.author,
            self.publisher,
            self.year,
            self.copies,
            category,
        ))
    }
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path(
        path: impl AsRef<Path>,
        library: &mut LibraryService,
    ) -> Result<usize, CatalogImportError> {
        let file = File::open(path.as_ref())?;
        let imported = Self::from_reader(file, library)?;
        info!(path = %path.as_ref().display(), imported, "catalog imported");
        Ok(imported)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        library: &mut LibraryService,
    ) -> Result<usize, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut imported = 0;
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);

            let row: CatalogRow = record
                .deserialize(Some(&headers))
                .map_err(|err| CatalogImportError::Row {
                    line,
                    message: err.to_string(),
                })?;
            let book = row
                .into_book()
                .map_err(|message| CatalogImportError::Row { line, message })?;

            library
                .add_book(book)
                .map_err(|source| CatalogImportError::Library { line, source })?;
            imported += 1;
        }

        Ok(imported)
    }
}

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, message: String },
    Library { line: u64, source: LibraryError },
}

impl fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "unable to read catalog: {err}"),
            CatalogImportError::Csv(err) => write!(f, "malformed catalog csv: {err}"),
            CatalogImportError::Row { line, message } => {
                write!(f, "line {line}: {message}")
            }
            CatalogImportError::Library { line, source } => {
                write!(f, "line {line}: {source}")
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Library { source, .. } => Some(source),
            CatalogImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}
