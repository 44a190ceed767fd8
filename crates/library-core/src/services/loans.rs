use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::domain::Loan;
use crate::error::LibraryError;
use crate::ids::{EntityKind, LoanId, MemberId, SequentialIds};
use crate::store::Registry;

use super::catalog::CatalogService;
use super::members::MemberService;

/// Issues and closes loans. Copy counts live in the catalog, so every
/// operation that moves a copy borrows the [`CatalogService`] explicitly.
#[derive(Debug)]
pub struct LoanService {
    loans: Registry<Loan>,
    history: HashMap<MemberId, Vec<LoanId>>,
    ids: SequentialIds,
    clock: Arc<dyn Clock>,
    fine_per_day: f64,
}

impl LoanService {
    pub fn new(clock: Arc<dyn Clock>, fine_per_day: f64) -> Self {
        Self {
            loans: Registry::new(),
            history: HashMap::new(),
            ids: SequentialIds::new(EntityKind::Loan),
            clock,
            fine_per_day,
        }
    }

    /// Lends one copy of `isbn` to `member_id`.
    ///
    /// Every rule is checked before anything is written, so a rejected issue
    /// leaves the catalog, the loan registry and the member history untouched.
    pub fn issue(
        &mut self,
        catalog: &mut CatalogService,
        members: &MemberService,
        member_id: &MemberId,
        isbn: &str,
    ) -> Result<&Loan, LibraryError> {
        let member = members.find(member_id)?;
        let book = catalog.find(isbn)?;

        if !member.active {
            debug!(%member_id, "issue rejected: member inactive");
            return Err(LibraryError::invalid("Member is not active"));
        }

        if !book.is_available() {
            debug!(%member_id, %isbn, "issue rejected: no copies on the shelf");
            return Err(LibraryError::BookNotAvailable {
                isbn: isbn.to_string(),
            });
        }

        let active = self.active_count(member_id);
        if !member.can_borrow_more(active) {
            let limit = member.membership_type.max_books();
            debug!(%member_id, active, limit, "issue rejected: loan limit reached");
            return Err(LibraryError::LoanLimitExceeded {
                member_id: member_id.clone(),
                limit,
            });
        }

        let loan_id: LoanId = self.ids.next_id();
        let loan = Loan::new(
            loan_id.clone(),
            member_id.clone(),
            isbn,
            self.clock.today(),
            member.membership_type.loan_duration_days(),
        );

        self.loans.insert(loan).map_err(|duplicate| {
            LibraryError::invalid(format!("Loan already exists: {}", duplicate.loan_id))
        })?;
        catalog.find_mut(isbn)?.borrow_copy();
        self.history
            .entry(member_id.clone())
            .or_default()
            .push(loan_id.clone());

        let loan = self.find(&loan_id)?;
        info!(
            loan_id = %loan.loan_id,
            %member_id,
            %isbn,
            due = %loan.due_date,
            "loan issued"
        );
        Ok(loan)
    }

    /// Closes an active loan, shelving the copy and charging any fine accrued
    /// up to today.
    pub fn return_loan(
        &mut self,
        catalog: &mut CatalogService,
        loan_id: &LoanId,
    ) -> Result<&Loan, LibraryError> {
        let today = self.clock.today();
        let fine_per_day = self.fine_per_day;

        let loan = self.active_loan_mut(loan_id)?;
        let book = catalog.find_mut(&loan.isbn)?;

        let fine = fine_for(loan, today, fine_per_day);
        loan.close_returned(today, fine)?;
        book.return_copy();

        info!(%loan_id, isbn = %loan.isbn, fine, "loan returned");
        Ok(loan)
    }

    /// Voids an active loan: the copy goes back without a fine or return date.
    pub fn cancel(
        &mut self,
        catalog: &mut CatalogService,
        loan_id: &LoanId,
    ) -> Result<&Loan, LibraryError> {
        let loan = self.active_loan_mut(loan_id)?;
        let book = catalog.find_mut(&loan.isbn)?;

        loan.close_cancelled()?;
        book.return_copy();

        info!(%loan_id, isbn = %loan.isbn, "loan cancelled");
        Ok(loan)
    }

    fn active_loan_mut(&mut self, loan_id: &LoanId) -> Result<&mut Loan, LibraryError> {
        let loan = self.loans.get_mut(loan_id.as_str()).ok_or_else(|| {
            debug!(%loan_id, "unknown loan");
            LibraryError::invalid(format!("Loan not found with ID: {loan_id}"))
        })?;

        if !loan.is_active() {
            debug!(%loan_id, status = ?loan.status(), "loan already closed");
            return Err(LibraryError::invalid("Loan is not active"));
        }
        Ok(loan)
    }

    /// Fine owed if the loan were closed today: days overdue times the daily
    /// rate, or 0 when not overdue.
    pub fn calculate_fine(&self, loan: &Loan) -> f64 {
        fine_for(loan, self.clock.today(), self.fine_per_day)
    }

    pub fn find(&self, loan_id: &LoanId) -> Result<&Loan, LibraryError> {
        self.loans
            .get(loan_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Loan, loan_id.as_str()))
    }

    pub fn active_by_member(&self, member_id: &MemberId) -> Vec<&Loan> {
        self.history(member_id)
            .into_iter()
            .filter(|loan| loan.is_active())
            .collect()
    }

    fn active_count(&self, member_id: &MemberId) -> usize {
        self.active_by_member(member_id).len()
    }

    /// Every loan the member has held, oldest first. Unknown members have an
    /// empty history.
    pub fn history(&self, member_id: &MemberId) -> Vec<&Loan> {
        self.history
            .get(member_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.loans.get(id.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn overdue(&self) -> Vec<&Loan> {
        let today = self.clock.today();
        self.loans
            .iter()
            .filter(|loan| loan.is_overdue(today))
            .collect()
    }

    pub fn total_active(&self) -> usize {
        self.loans.iter().filter(|loan| loan.is_active()).count()
    }

    pub fn all(&self) -> Vec<&Loan> {
        self.loans.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}

fn fine_for(loan: &Loan, today: NaiveDate, fine_per_day: f64) -> f64 {
    if !loan.is_overdue(today) {
        return 0.0;
    }
    loan.days_overdue(today) as f64 * fine_per_day
}
