//! Library circulation engine: catalogue, members, loans, reservations,
//! authors and publishers held in memory behind a single façade.

pub mod catalog_import;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod ids;
pub mod router;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use catalog_import::{CatalogImportError, CatalogImporter};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, AppEnvironment, CirculationPolicy, ConfigError};
pub use domain::{
    Author, AuthorProfile, Book, BookCategory, BookUpdate, Loan, LoanStatus, Member,
    MemberUpdate, MembershipType, NewBook, NewMember, Publisher, PublisherProfile, Reservation,
    ReservationStatus,
};
pub use error::{AppError, LibraryError};
pub use ids::{AuthorId, EntityKind, LoanId, MemberId, PublisherId, ReservationId};
pub use router::{library_router, LoanView, SharedLibrary};
pub use services::{LibraryService, LibrarySummary};
