use super::common::*;
use chrono::Duration;
use crate::domain::{MemberUpdate, MembershipType, NewMember};
use crate::error::LibraryError;
use crate::ids::EntityKind;

#[test]
fn register_validates_contact_details() {
    let clock = clock();
    let mut library = library_with(&clock);

    let mut blank_id = member("M-1", MembershipType::Basic);
    blank_id.member_id = member_id(" ");
    let mut bad_email = member("M-1", MembershipType::Basic);
    bad_email.email = "reader.example.org".to_string();
    let mut bad_phone = member("M-1", MembershipType::Basic);
    bad_phone.phone_number = "555-1234".to_string();
    let mut blank_name = member("M-1", MembershipType::Basic);
    blank_name.name = String::new();

    for (candidate, expected) in [
        (blank_id, "Member ID cannot be empty"),
        (bad_email, "Invalid email format: reader.example.org"),
        (bad_phone, "Invalid phone number format: 555-1234"),
        (blank_name, "Name cannot be empty"),
    ] {
        assert_eq!(
            library.register_member(candidate).expect_err("rejected"),
            LibraryError::InvalidInput(expected.to_string())
        );
    }
    assert!(library.members().is_empty());
}

#[test]
fn duplicate_member_id_keeps_existing_history() {
    let (mut library, _) = stocked_library();
    library
        .issue_book(&member_id("M-1"), EFFECTIVE_JAVA)
        .expect("loan issued");

    let err = library
        .register_member(member("M-1", MembershipType::Faculty))
        .expect_err("duplicate rejected");
    assert!(matches!(err, LibraryError::InvalidInput(_)));

    let existing = library.find_member(&member_id("M-1")).expect("present");
    assert_eq!(existing.membership_type, MembershipType::Basic);
    assert_eq!(library.loan_history(&member_id("M-1")).len(), 1);
}

#[test]
fn enroll_stamps_today_when_no_date_given() {
    let clock = clock();
    let mut library = library_with(&clock);
    clock.advance_days(10);

    let member = library
        .enroll(NewMember {
            member_id: member_id("M-50"),
            name: "Katherine Johnson".to_string(),
            email: "kj@example.org".to_string(),
            phone_number: "5559876543".to_string(),
            membership_type: MembershipType::Faculty,
            membership_date: None,
        })
        .expect("enrolled");

    assert_eq!(member.membership_date, start_date() + Duration::days(10));
    assert!(member.active);
}

#[test]
fn update_revalidates_and_replaces_fields() {
    let (mut library, _) = stocked_library();
    let id = member_id("M-1");

    let updated = library
        .update_member(
            &id,
            MemberUpdate {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.org".to_string(),
                phone_number: "5550000000".to_string(),
                membership_type: MembershipType::Student,
            },
        )
        .expect("updated");
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.membership_type.max_books(), 4);

    let err = library
        .update_member(
            &id,
            MemberUpdate {
                name: "Ada Lovelace".to_string(),
                email: "not-an-email".to_string(),
                phone_number: "5550000000".to_string(),
                membership_type: MembershipType::Student,
            },
        )
        .expect_err("bad email");
    assert!(matches!(err, LibraryError::InvalidInput(_)));
    assert_eq!(
        library.find_member(&id).expect("present").email,
        "ada@example.org"
    );
}

#[test]
fn membership_cannot_drop_below_loans_out() {
    let (mut library, _) = stocked_library();
    let id = member_id("M-9");
    library
        .register_member(member("M-9", MembershipType::Faculty))
        .expect("faculty member registered");
    for _ in 0..4 {
        library.issue_book(&id, EFFECTIVE_JAVA).expect("loan issued");
    }

    let change_to = |membership_type| MemberUpdate {
        name: "Reader M-9".to_string(),
        email: "m-9@example.org".to_string(),
        phone_number: "5551234567".to_string(),
        membership_type,
    };

    let err = library
        .update_member(&id, change_to(MembershipType::Basic))
        .expect_err("basic allows three");
    assert!(matches!(err, LibraryError::InvalidInput(ref m) if m.contains("4 active loans")));
    assert_eq!(
        library.find_member(&id).expect("present").membership_type,
        MembershipType::Faculty
    );

    let updated = library
        .update_member(&id, change_to(MembershipType::Student))
        .expect("student allows four");
    assert_eq!(updated.membership_type, MembershipType::Student);
}

#[test]
fn deactivate_is_a_soft_delete() {
    let (mut library, _) = stocked_library();
    let id = member_id("M-2");

    library.deactivate_member(&id).expect("deactivated");

    let active: Vec<_> = library
        .active_members()
        .into_iter()
        .map(|member| member.member_id.as_str())
        .collect();
    assert_eq!(active, vec!["M-1"]);
    assert!(!library.find_member(&id).expect("still stored").active);
    assert_eq!(library.total_members(), 2);
}

#[test]
fn missing_members_are_not_found() {
    let (mut library, _) = stocked_library();
    let ghost = member_id("M-404");

    let expected = LibraryError::NotFound {
        kind: EntityKind::Member,
        id: "M-404".to_string(),
    };
    assert_eq!(library.find_member(&ghost).expect_err("missing"), expected);
    assert_eq!(
        library.deactivate_member(&ghost).expect_err("missing"),
        expected
    );
}
