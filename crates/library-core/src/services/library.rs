use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::CirculationPolicy;
use crate::domain::{
    Book, BookCategory, BookUpdate, Loan, Member, MemberUpdate, NewMember, Reservation,
};
use crate::error::LibraryError;
use crate::ids::{LoanId, MemberId, ReservationId};

use super::authors::AuthorService;
use super::catalog::CatalogService;
use super::loans::LoanService;
use super::members::MemberService;
use super::publishers::PublisherService;
use super::reservations::ReservationService;

/// Headline counts for dashboards and the demo report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    pub as_of: NaiveDate,
    pub total_books: usize,
    pub available_books: usize,
    pub total_members: usize,
    pub active_members: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub active_reservations: usize,
}

/// Entry point owning every registry. Operations that span entities (loans
/// and reservations touch books and members) are coordinated here.
#[derive(Debug)]
pub struct LibraryService {
    clock: Arc<dyn Clock>,
    policy: CirculationPolicy,
    catalog: CatalogService,
    members: MemberService,
    loans: LoanService,
    reservations: ReservationService,
    authors: AuthorService,
    publishers: PublisherService,
}

impl Default for LibraryService {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryService {
    /// Uses the host calendar and the default circulation policy.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), CirculationPolicy::default())
    }

    pub fn with_clock(clock: Arc<dyn Clock>, policy: CirculationPolicy) -> Self {
        Self {
            catalog: CatalogService::new(Arc::clone(&clock)),
            members: MemberService::new(),
            loans: LoanService::new(Arc::clone(&clock), policy.fine_per_day),
            reservations: ReservationService::new(
                Arc::clone(&clock),
                policy.reservation_hold_days,
            ),
            authors: AuthorService::new(),
            publishers: PublisherService::new(),
            clock,
            policy,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn policy(&self) -> CirculationPolicy {
        self.policy
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn members(&self) -> &MemberService {
        &self.members
    }

    pub fn loans(&self) -> &LoanService {
        &self.loans
    }

    pub fn reservations(&self) -> &ReservationService {
        &self.reservations
    }

    pub fn authors(&self) -> &AuthorService {
        &self.authors
    }

    pub fn authors_mut(&mut self) -> &mut AuthorService {
        &mut self.authors
    }

    pub fn publishers(&self) -> &PublisherService {
        &self.publishers
    }

    pub fn publishers_mut(&mut self) -> &mut PublisherService {
        &mut self.publishers
    }

    // Catalog

    pub fn add_book(&mut self, book: Book) -> Result<&Book, LibraryError> {
        self.catalog.add(book)
    }

    pub fn find_book(&self, isbn: &str) -> Result<&Book, LibraryError> {
        self.catalog.find(isbn)
    }

    pub fn search_books_by_title(&self, query: &str) -> Vec<&Book> {
        self.catalog.search_by_title(query)
    }

    pub fn search_books_by_author(&self, query: &str) -> Vec<&Book> {
        self.catalog.search_by_author(query)
    }

    pub fn books_by_category(&self, category: BookCategory) -> Vec<&Book> {
        self.catalog.by_category(category)
    }

    pub fn available_books(&self) -> Vec<&Book> {
        self.catalog.available()
    }

    pub fn update_book(&mut self, isbn: &str, update: BookUpdate) -> Result<&Book, LibraryError> {
        self.catalog.update(isbn, update)
    }

    /// Titles with copies still out on loan cannot be withdrawn.
    pub fn remove_book(&mut self, isbn: &str) -> Result<Book, LibraryError> {
        let on_loan = self.catalog.find(isbn)?.copies_on_loan();
        if on_loan > 0 {
            debug!(%isbn, on_loan, "remove rejected: copies on loan");
            return Err(LibraryError::invalid(format!(
                "Cannot remove book {isbn} while {on_loan} copies are on loan"
            )));
        }
        self.catalog.remove(isbn)
    }

    // Members

    pub fn register_member(&mut self, member: Member) -> Result<&Member, LibraryError> {
        self.members.register(member)
    }

    /// Registers from a payload, stamping today's date when none is given.
    pub fn enroll(&mut self, member: NewMember) -> Result<&Member, LibraryError> {
        let today = self.today();
        self.members.register(member.into_member(today))
    }

    pub fn find_member(&self, member_id: &MemberId) -> Result<&Member, LibraryError> {
        self.members.find(member_id)
    }

    pub fn update_member(
        &mut self,
        member_id: &MemberId,
        update: MemberUpdate,
    ) -> Result<&Member, LibraryError> {
        let active = self.loans.active_by_member(member_id).len();
        let limit = update.membership_type.max_books();
        if active > limit as usize {
            debug!(%member_id, active, limit, "membership change rejected: too many loans out");
            return Err(LibraryError::invalid(format!(
                "Member {member_id} has {active} active loans; {} membership allows {limit}",
                update.membership_type.label()
            )));
        }
        self.members.update(member_id, update)
    }

    pub fn deactivate_member(&mut self, member_id: &MemberId) -> Result<&Member, LibraryError> {
        self.members.deactivate(member_id)
    }

    pub fn active_members(&self) -> Vec<&Member> {
        self.members.active()
    }

    // Loans

    pub fn issue_book(&mut self, member_id: &MemberId, isbn: &str) -> Result<&Loan, LibraryError> {
        self.loans
            .issue(&mut self.catalog, &self.members, member_id, isbn)
    }

    pub fn return_book(&mut self, loan_id: &LoanId) -> Result<&Loan, LibraryError> {
        self.loans.return_loan(&mut self.catalog, loan_id)
    }

    pub fn cancel_loan(&mut self, loan_id: &LoanId) -> Result<&Loan, LibraryError> {
        self.loans.cancel(&mut self.catalog, loan_id)
    }

    pub fn calculate_fine(&self, loan: &Loan) -> f64 {
        self.loans.calculate_fine(loan)
    }

    pub fn find_loan(&self, loan_id: &LoanId) -> Result<&Loan, LibraryError> {
        self.loans.find(loan_id)
    }

    pub fn active_loans_by_member(&self, member_id: &MemberId) -> Vec<&Loan> {
        self.loans.active_by_member(member_id)
    }

    pub fn overdue_loans(&self) -> Vec<&Loan> {
        self.loans.overdue()
    }

    pub fn loan_history(&self, member_id: &MemberId) -> Vec<&Loan> {
        self.loans.history(member_id)
    }

    // Reservations

    pub fn reserve_book(
        &mut self,
        member_id: &MemberId,
        isbn: &str,
    ) -> Result<&Reservation, LibraryError> {
        self.reservations
            .create(&self.catalog, &self.members, member_id, isbn)
    }

    pub fn cancel_reservation(
        &mut self,
        reservation_id: &ReservationId,
    ) -> Result<&Reservation, LibraryError> {
        self.reservations.cancel(reservation_id)
    }

    pub fn fulfill_reservation(
        &mut self,
        reservation_id: &ReservationId,
    ) -> Result<&Reservation, LibraryError> {
        self.reservations.fulfill(reservation_id)
    }

    pub fn find_reservation(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<&Reservation, LibraryError> {
        self.reservations.find(reservation_id)
    }

    pub fn active_reservations_by_member(&self, member_id: &MemberId) -> Vec<&Reservation> {
        self.reservations.active_by_member(member_id)
    }

    pub fn reservations_for_book(&self, isbn: &str) -> Vec<&Reservation> {
        self.reservations.active_by_book(isbn)
    }

    pub fn expired_reservations(&self) -> Vec<&Reservation> {
        self.reservations.expired()
    }

    pub fn process_expired_reservations(&mut self) -> usize {
        self.reservations.process_expired()
    }

    // Statistics

    pub fn total_books(&self) -> usize {
        self.catalog.len()
    }

    pub fn total_members(&self) -> usize {
        self.members.len()
    }

    pub fn total_active_loans(&self) -> usize {
        self.loans.total_active()
    }

    pub fn summary(&self) -> LibrarySummary {
        LibrarySummary {
            as_of: self.today(),
            total_books: self.catalog.len(),
            available_books: self.catalog.available().len(),
            total_members: self.members.len(),
            active_members: self.members.active().len(),
            active_loans: self.loans.total_active(),
            overdue_loans: self.loans.overdue().len(),
            active_reservations: self.reservations.total_active(),
        }
    }
}
