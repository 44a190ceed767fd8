//! Library entities. Each one is identified by its primary key alone; two
//! values with the same key compare equal regardless of their other fields.

pub mod author;
pub mod book;
pub mod loan;
pub mod member;
pub mod publisher;
pub mod reservation;

pub use author::{Author, AuthorProfile};
pub use book::{Book, BookCategory, BookUpdate, NewBook};
pub use loan::{Loan, LoanStatus};
pub use member::{Member, MemberUpdate, MembershipType, NewMember};
pub use publisher::{Publisher, PublisherProfile};
pub use reservation::{Reservation, ReservationStatus};
