use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::clock::FixedClock;
use crate::config::CirculationPolicy;
use crate::domain::{Book, BookCategory, Member, MembershipType};
use crate::ids::MemberId;
use crate::services::LibraryService;

pub(super) const EFFECTIVE_JAVA: &str = "9780134685991";
pub(super) const LUNAR_NOTES: &str = "0306406152";

pub(super) fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

pub(super) fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(start_date()))
}

pub(super) fn library_with(clock: &Arc<FixedClock>) -> LibraryService {
    LibraryService::with_clock(clock.clone(), CirculationPolicy::default())
}

pub(super) fn effective_java(copies: u32) -> Book {
    Book::new(
        EFFECTIVE_JAVA,
        "Effective Java",
        "Joshua Bloch",
        "Addison-Wesley",
        2018,
        copies,
        BookCategory::Technology,
    )
}

pub(super) fn lunar_notes(copies: u32) -> Book {
    Book::new(
        LUNAR_NOTES,
        "Lunar Field Notes",
        "Mae Jemison",
        "Plenum",
        1999,
        copies,
        BookCategory::Science,
    )
}

pub(super) fn member(id: &str, membership_type: MembershipType) -> Member {
    Member::new(
        id,
        format!("Reader {id}"),
        format!("{}@example.org", id.to_lowercase()),
        "5551234567",
        start_date(),
        membership_type,
    )
}

pub(super) fn member_id(id: &str) -> MemberId {
    MemberId::from(id)
}

/// A library holding Effective Java (5 copies), Lunar Field Notes (1 copy),
/// a basic member `M-1` and a premium member `M-2`.
pub(super) fn stocked_library() -> (LibraryService, Arc<FixedClock>) {
    let clock = clock();
    let mut library = library_with(&clock);
    library
        .add_book(effective_java(5))
        .expect("effective java added");
    library.add_book(lunar_notes(1)).expect("lunar notes added");
    library
        .register_member(member("M-1", MembershipType::Basic))
        .expect("basic member registered");
    library
        .register_member(member("M-2", MembershipType::Premium))
        .expect("premium member registered");
    (library, clock)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
