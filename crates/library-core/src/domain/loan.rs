use crate::error::LibraryError;
use crate::ids::{LoanId, MemberId};
use crate::store::Keyed;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Returned,
    /// Reported for active loans past their due date; never stored.
    Overdue,
    Cancelled,
}

/// One copy of a book lent to a member.
///
/// The lifecycle fields are private: a loan leaves `Active` exactly once,
/// through [`Loan::close_returned`] or [`Loan::close_cancelled`].
#[derive(Debug, Clone, Serialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub member_id: MemberId,
    pub isbn: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    return_date: Option<NaiveDate>,
    status: LoanStatus,
    fine_amount: f64,
}

impl Loan {
    pub fn new(
        loan_id: LoanId,
        member_id: MemberId,
        isbn: impl Into<String>,
        loan_date: NaiveDate,
        loan_duration_days: i64,
    ) -> Self {
        Self {
            loan_id,
            member_id,
            isbn: isbn.into(),
            loan_date,
            due_date: loan_date + Duration::days(loan_duration_days),
            return_date: None,
            status: LoanStatus::Active,
            fine_amount: 0.0,
        }
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn fine_amount(&self) -> f64 {
        self.fine_amount
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && today > self.due_date
    }

    /// Whole days past the due date; 0 unless the loan is overdue.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }

    pub fn effective_status(&self, today: NaiveDate) -> LoanStatus {
        if self.is_overdue(today) {
            LoanStatus::Overdue
        } else {
            self.status
        }
    }

    pub(crate) fn close_returned(
        &mut self,
        today: NaiveDate,
        fine_amount: f64,
    ) -> Result<(), LibraryError> {
        self.ensure_active()?;
        self.return_date = Some(today);
        self.fine_amount = fine_amount;
        self.status = LoanStatus::Returned;
        Ok(())
    }

    pub(crate) fn close_cancelled(&mut self) -> Result<(), LibraryError> {
        self.ensure_active()?;
        self.status = LoanStatus::Cancelled;
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), LibraryError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(LibraryError::invalid("Loan is not active"))
        }
    }
}

impl PartialEq for Loan {
    fn eq(&self, other: &Self) -> bool {
        self.loan_id == other.loan_id
    }
}

impl Keyed for Loan {
    fn key(&self) -> &str {
        self.loan_id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn loan() -> Loan {
        Loan::new(
            LoanId::from("LOAN-1001"),
            MemberId::from("M-1"),
            "9780134685991",
            date(2025, 3, 1),
            14,
        )
    }

    #[test]
    fn due_date_follows_duration() {
        let loan = loan();
        assert_eq!(loan.due_date, date(2025, 3, 15));
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.return_date(), None);
        assert_eq!(loan.fine_amount(), 0.0);
    }

    #[test]
    fn overdue_is_derived_from_today() {
        let loan = loan();
        assert!(!loan.is_overdue(date(2025, 3, 15)));
        assert_eq!(loan.days_overdue(date(2025, 3, 15)), 0);
        assert_eq!(loan.effective_status(date(2025, 3, 15)), LoanStatus::Active);

        assert!(loan.is_overdue(date(2025, 3, 20)));
        assert_eq!(loan.days_overdue(date(2025, 3, 20)), 5);
        assert_eq!(
            loan.effective_status(date(2025, 3, 20)),
            LoanStatus::Overdue
        );
        assert_eq!(loan.status(), LoanStatus::Active);
    }

    #[test]
    fn closed_loans_stay_closed() {
        let mut loan = loan();
        loan.close_returned(date(2025, 3, 20), 5.0)
            .expect("active loan closes");
        assert_eq!(loan.status(), LoanStatus::Returned);
        assert!(!loan.is_overdue(date(2025, 4, 30)));

        assert_eq!(
            loan.close_returned(date(2025, 3, 21), 6.0),
            Err(LibraryError::invalid("Loan is not active"))
        );
        assert!(loan.close_cancelled().is_err());
        assert_eq!(loan.return_date(), Some(date(2025, 3, 20)));
        assert_eq!(loan.fine_amount(), 5.0);
    }
}
