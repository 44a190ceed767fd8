use super::common::*;
use crate::domain::ReservationStatus;
use crate::error::LibraryError;
use crate::ids::{EntityKind, ReservationId};
use chrono::Duration;

#[test]
fn create_holds_for_seven_days() {
    let (mut library, _) = stocked_library();

    let hold = library
        .reserve_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("reserved");
    assert_eq!(hold.reservation_id.as_str(), "RES-1001");
    assert_eq!(hold.reservation_date, start_date());
    assert_eq!(hold.expiry_date, start_date() + Duration::days(7));
    assert_eq!(hold.status(), ReservationStatus::Active);
}

#[test]
fn create_validates_member_and_book() {
    let (mut library, _) = stocked_library();

    assert_eq!(
        library
            .reserve_book(&member_id(""), LUNAR_NOTES)
            .expect_err("blank member"),
        LibraryError::InvalidInput("Member ID cannot be empty".to_string())
    );
    assert_eq!(
        library
            .reserve_book(&member_id("M-1"), "not-an-isbn")
            .expect_err("bad isbn"),
        LibraryError::InvalidInput("Invalid ISBN format: not-an-isbn".to_string())
    );
    assert!(matches!(
        library.reserve_book(&member_id("M-404"), LUNAR_NOTES),
        Err(LibraryError::NotFound {
            kind: EntityKind::Member,
            ..
        })
    ));
    assert!(matches!(
        library.reserve_book(&member_id("M-1"), "9999999999"),
        Err(LibraryError::NotFound {
            kind: EntityKind::Book,
            ..
        })
    ));
    assert!(library.reservations().is_empty());
}

#[test]
fn one_active_hold_per_member_and_title() {
    let (mut library, _) = stocked_library();
    let first = library
        .reserve_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("first hold")
        .reservation_id
        .clone();

    assert!(matches!(
        library.reserve_book(&member_id("M-1"), LUNAR_NOTES),
        Err(LibraryError::InvalidInput(_))
    ));
    library
        .reserve_book(&member_id("M-2"), LUNAR_NOTES)
        .expect("other member may hold the same title");
    library
        .reserve_book(&member_id("M-1"), EFFECTIVE_JAVA)
        .expect("same member may hold another title");

    library.cancel_reservation(&first).expect("cancelled");
    library
        .reserve_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("hold allowed again after cancellation");

    assert_eq!(library.reservations_for_book(LUNAR_NOTES).len(), 2);
    assert_eq!(
        library
            .active_reservations_by_member(&member_id("M-1"))
            .len(),
        2
    );
}

#[test]
fn terminal_reservations_cannot_transition() {
    let (mut library, _) = stocked_library();
    let id = library
        .reserve_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("reserved")
        .reservation_id
        .clone();

    let hold = library.fulfill_reservation(&id).expect("fulfilled");
    assert_eq!(hold.status(), ReservationStatus::Fulfilled);

    assert!(matches!(
        library.cancel_reservation(&id),
        Err(LibraryError::InvalidInput(_))
    ));
    assert!(matches!(
        library.fulfill_reservation(&id),
        Err(LibraryError::InvalidInput(_))
    ));
    assert_eq!(
        library.find_reservation(&id).expect("present").status(),
        ReservationStatus::Fulfilled
    );
}

#[test]
fn unknown_reservation_ids() {
    let (mut library, _) = stocked_library();
    let ghost = ReservationId::from("RES-9");

    assert_eq!(
        library.cancel_reservation(&ghost).expect_err("unknown"),
        LibraryError::InvalidInput("Reservation not found: RES-9".to_string())
    );
    assert_eq!(
        library.fulfill_reservation(&ghost).expect_err("unknown"),
        LibraryError::InvalidInput("Reservation not found: RES-9".to_string())
    );
    assert!(matches!(
        library.find_reservation(&ghost),
        Err(LibraryError::NotFound {
            kind: EntityKind::Reservation,
            ..
        })
    ));
}

#[test]
fn expiry_sweep_marks_lapsed_holds() {
    let (mut library, clock) = stocked_library();
    let lapsed = library
        .reserve_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("reserved")
        .reservation_id
        .clone();

    clock.advance_days(7);
    assert!(library.expired_reservations().is_empty());

    clock.advance_days(1);
    let fresh = library
        .reserve_book(&member_id("M-2"), LUNAR_NOTES)
        .expect("reserved later")
        .reservation_id
        .clone();

    let expired: Vec<_> = library
        .expired_reservations()
        .into_iter()
        .map(|hold| hold.reservation_id.clone())
        .collect();
    assert_eq!(expired, vec![lapsed.clone()]);

    assert_eq!(library.process_expired_reservations(), 1);
    assert_eq!(
        library.find_reservation(&lapsed).expect("present").status(),
        ReservationStatus::Expired
    );
    assert_eq!(
        library.find_reservation(&fresh).expect("present").status(),
        ReservationStatus::Active
    );
    assert_eq!(library.process_expired_reservations(), 0);
    assert!(library.cancel_reservation(&lapsed).is_err());
}

#[test]
fn hold_days_follow_policy() {
    use crate::config::CirculationPolicy;
    use crate::services::LibraryService;

    let clock = clock();
    let mut library = LibraryService::with_clock(
        clock.clone(),
        CirculationPolicy {
            fine_per_day: 0.5,
            reservation_hold_days: 3,
        },
    );
    library.add_book(lunar_notes(1)).expect("added");
    library
        .register_member(member("M-1", crate::domain::MembershipType::Student))
        .expect("registered");

    let hold = library
        .reserve_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("reserved");
    assert_eq!(hold.expiry_date, start_date() + Duration::days(3));
}
