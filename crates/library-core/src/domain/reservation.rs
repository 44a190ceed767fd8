use crate::error::LibraryError;
use crate::ids::{MemberId, ReservationId};
use crate::store::Keyed;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Active,
    Fulfilled,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// A member's hold on a title.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub member_id: MemberId,
    pub isbn: String,
    pub reservation_date: NaiveDate,
    pub expiry_date: NaiveDate,
    status: ReservationStatus,
}

impl Reservation {
    pub fn with_hold(
        reservation_id: ReservationId,
        member_id: MemberId,
        isbn: impl Into<String>,
        reservation_date: NaiveDate,
        hold_days: i64,
    ) -> Self {
        Self {
            reservation_id,
            member_id,
            isbn: isbn.into(),
            reservation_date,
            expiry_date: reservation_date + Duration::days(hold_days),
            status: ReservationStatus::Active,
        }
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.is_active() && today > self.expiry_date
    }

    pub(crate) fn cancel(&mut self) -> Result<(), LibraryError> {
        self.transition(ReservationStatus::Cancelled)
    }

    pub(crate) fn fulfill(&mut self) -> Result<(), LibraryError> {
        self.transition(ReservationStatus::Fulfilled)
    }

    pub(crate) fn expire(&mut self) -> Result<(), LibraryError> {
        self.transition(ReservationStatus::Expired)
    }

    fn transition(&mut self, next: ReservationStatus) -> Result<(), LibraryError> {
        if self.status.is_terminal() {
            return Err(LibraryError::invalid(format!(
                "Reservation {} is already {:?}",
                self.reservation_id, self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.reservation_id == other.reservation_id
    }
}

impl Keyed for Reservation {
    fn key(&self) -> &str {
        self.reservation_id.as_str()
    }
}
