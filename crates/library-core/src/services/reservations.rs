use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::domain::Reservation;
use crate::error::LibraryError;
use crate::ids::{EntityKind, MemberId, ReservationId, SequentialIds};
use crate::store::Registry;
use crate::validation;

use super::catalog::CatalogService;
use super::members::MemberService;

#[derive(Debug)]
pub struct ReservationService {
    reservations: Registry<Reservation>,
    ids: SequentialIds,
    clock: Arc<dyn Clock>,
    hold_days: i64,
}

impl ReservationService {
    pub fn new(clock: Arc<dyn Clock>, hold_days: i64) -> Self {
        Self {
            reservations: Registry::new(),
            ids: SequentialIds::new(EntityKind::Reservation),
            clock,
            hold_days,
        }
    }

    /// Places a hold for `member_id` on `isbn`. A member holds at most one
    /// active reservation per title.
    pub fn create(
        &mut self,
        catalog: &CatalogService,
        members: &MemberService,
        member_id: &MemberId,
        isbn: &str,
    ) -> Result<&Reservation, LibraryError> {
        validation::validate_not_empty(member_id.as_str(), "Member ID")?;
        validation::validate_isbn(isbn)?;
        members.find(member_id)?;
        catalog.find(isbn)?;

        let duplicate = self
            .reservations
            .iter()
            .any(|held| held.is_active() && held.member_id == *member_id && held.isbn == isbn);
        if duplicate {
            debug!(%member_id, %isbn, "reservation rejected: already held");
            return Err(LibraryError::invalid(format!(
                "Member {member_id} already has an active reservation for ISBN: {isbn}"
            )));
        }

        let reservation = Reservation::with_hold(
            self.ids.next_id(),
            member_id.clone(),
            isbn,
            self.clock.today(),
            self.hold_days,
        );

        let stored = self.reservations.insert(reservation).map_err(|existing| {
            LibraryError::invalid(format!(
                "Reservation already exists: {}",
                existing.reservation_id
            ))
        })?;

        info!(
            reservation_id = %stored.reservation_id,
            %member_id,
            %isbn,
            expires = %stored.expiry_date,
            "reservation created"
        );
        Ok(stored)
    }

    pub fn cancel(&mut self, reservation_id: &ReservationId) -> Result<&Reservation, LibraryError> {
        let reservation = self.known_mut(reservation_id)?;
        reservation.cancel()?;
        info!(%reservation_id, "reservation cancelled");
        Ok(reservation)
    }

    pub fn fulfill(
        &mut self,
        reservation_id: &ReservationId,
    ) -> Result<&Reservation, LibraryError> {
        let reservation = self.known_mut(reservation_id)?;
        reservation.fulfill()?;
        info!(%reservation_id, "reservation fulfilled");
        Ok(reservation)
    }

    fn known_mut(
        &mut self,
        reservation_id: &ReservationId,
    ) -> Result<&mut Reservation, LibraryError> {
        self.reservations
            .get_mut(reservation_id.as_str())
            .ok_or_else(|| {
                debug!(%reservation_id, "unknown reservation");
                LibraryError::invalid(format!("Reservation not found: {reservation_id}"))
            })
    }

    pub fn find(&self, reservation_id: &ReservationId) -> Result<&Reservation, LibraryError> {
        self.reservations
            .get(reservation_id.as_str())
            .ok_or_else(|| {
                LibraryError::not_found(EntityKind::Reservation, reservation_id.as_str())
            })
    }

    pub fn active_by_member(&self, member_id: &MemberId) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|held| held.is_active() && held.member_id == *member_id)
            .collect()
    }

    /// Active holds on a title, oldest first.
    pub fn active_by_book(&self, isbn: &str) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|held| held.is_active() && held.isbn == isbn)
            .collect()
    }

    /// Active reservations whose expiry date has passed. They stay active
    /// until [`ReservationService::process_expired`] runs.
    pub fn expired(&self) -> Vec<&Reservation> {
        let today = self.clock.today();
        self.reservations
            .iter()
            .filter(|held| held.is_expired(today))
            .collect()
    }

    /// Marks every lapsed reservation as expired and returns how many moved.
    pub fn process_expired(&mut self) -> usize {
        let today = self.clock.today();
        let mut swept = 0;
        for held in self.reservations.iter_mut() {
            if held.is_expired(today) && held.expire().is_ok() {
                swept += 1;
            }
        }

        if swept > 0 {
            info!(swept, %today, "expired reservations processed");
        }
        swept
    }

    pub fn all(&self) -> Vec<&Reservation> {
        self.reservations.iter().collect()
    }

    pub fn total_active(&self) -> usize {
        self.reservations
            .iter()
            .filter(|held| held.is_active())
            .count()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}
