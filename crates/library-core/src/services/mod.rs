//! Circulation services.
//!
//! Each service owns the registry for one entity type. [`LibraryService`]
//! owns all of them and is the only place where an operation reaches across
//! registries.

pub mod authors;
pub mod catalog;
pub mod library;
pub mod loans;
pub mod members;
pub mod publishers;
pub mod reservations;

#[cfg(test)]
mod tests;

pub use authors::AuthorService;
pub use catalog::CatalogService;
pub use library::{LibraryService, LibrarySummary};
pub use loans::LoanService;
pub use members::MemberService;
pub use publishers::PublisherService;
pub use reservations::ReservationService;
