use crate::infra::build_library;
use chrono::{Local, NaiveDate};
use clap::Args;
use library_core::{
    AppError, AuthorProfile, Book, BookCategory, CirculationPolicy, FixedClock, LibraryError,
    LibraryService, LibrarySummary, LoanId, Member, MemberId, MembershipType, PublisherProfile,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Opening date of the walkthrough (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Catalogue CSV to lend from instead of the built-in sample shelf.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
}

const SAMPLE_SHELF: [(&str, &str, &str, &str, i32, u32, BookCategory); 3] = [
    (
        "9780134685991",
        "Effective Java",
        "Joshua Bloch",
        "Addison-Wesley",
        2018,
        5,
        BookCategory::Technology,
    ),
    (
        "0306406152",
        "Lunar Field Notes",
        "Mae Jemison",
        "Plenum",
        1999,
        1,
        BookCategory::Science,
    ),
    (
        "978-1-4028-9462-6",
        "A Short History of Lending",
        "Ada Archivist",
        "Harbor House",
        2012,
        2,
        BookCategory::History,
    ),
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, catalog_csv } = args;
    let opening = today.unwrap_or_else(|| Local::now().date_naive());
    let clock = Arc::new(FixedClock::new(opening));

    let mut library = build_library(
        clock.clone(),
        CirculationPolicy::default(),
        catalog_csv.as_deref(),
    )?;
    if library.total_books() == 0 {
        seed_shelf(&mut library)?;
    }
    seed_people(&mut library, opening)?;

    let policy = library.policy();
    println!("Library desk demo (opening {opening})");
    println!(
        "- fines {:.2} per overdue day, holds last {} days",
        policy.fine_per_day, policy.reservation_hold_days
    );
    println!("- {} titles on the shelf", library.total_books());
    for book in library.catalog().all() {
        println!(
            "  - {} | {} by {} | {} of {} copies available",
            book.isbn,
            book.title,
            book.author,
            book.available_copies(),
            book.total_copies
        );
    }

    let isbns: Vec<String> = library
        .catalog()
        .all()
        .into_iter()
        .map(|book| book.isbn.clone())
        .collect();
    let Some(first_isbn) = isbns.first().cloned() else {
        println!("Catalogue is empty; nothing to lend.");
        return Ok(());
    };
    let last_isbn = isbns.last().cloned().unwrap_or_else(|| first_isbn.clone());

    println!("\nIssuing loans");
    let basic = MemberId::from("M-100");
    let premium = MemberId::from("M-200");
    let mut issued: Vec<LoanId> = Vec::new();
    for (member_id, isbn) in [
        (&basic, &first_isbn),
        (&premium, &first_isbn),
        (&premium, &last_isbn),
    ] {
        match library.issue_book(member_id, isbn) {
            Ok(loan) => {
                println!(
                    "- {} -> {} borrows {} (due {})",
                    loan.loan_id, loan.member_id, loan.isbn, loan.due_date
                );
                issued.push(loan.loan_id.clone());
            }
            Err(err) => println!("- {member_id} could not borrow {isbn}: {err}"),
        }
    }

    for extra in 0..3 {
        if let Err(err) = library.issue_book(&basic, &first_isbn) {
            println!("- request {} for {basic} refused: {err}", extra + 1);
            break;
        }
    }

    println!("\nReserving");
    match library.reserve_book(&premium, &first_isbn) {
        Ok(hold) => println!(
            "- {} holds {} for {} until {}",
            hold.reservation_id, hold.isbn, hold.member_id, hold.expiry_date
        ),
        Err(err) => println!("- reservation refused: {err}"),
    }

    clock.advance_days(19);
    let today = library.today();
    println!("\nNineteen days later ({today})");
    for loan in library.overdue_loans() {
        println!(
            "- {} overdue by {} days; fine so far {:.2}",
            loan.loan_id,
            loan.days_overdue(today),
            library.calculate_fine(loan)
        );
    }

    for loan_id in &issued {
        match library.return_book(loan_id) {
            Ok(loan) => println!(
                "- {} returned, fine charged {:.2}",
                loan.loan_id,
                loan.fine_amount()
            ),
            Err(LibraryError::InvalidInput(reason)) => println!("- {loan_id} skipped: {reason}"),
            Err(err) => return Err(err.into()),
        }
    }

    let swept = library.process_expired_reservations();
    println!("- {swept} lapsed reservation(s) expired");

    render_summary(&library.summary());
    Ok(())
}

fn seed_shelf(library: &mut LibraryService) -> Result<(), LibraryError> {
    for (isbn, title, author, publisher, year, copies, category) in SAMPLE_SHELF {
        library.add_book(Book::new(
            isbn, title, author, publisher, year, copies, category,
        ))?;
    }
    Ok(())
}

fn seed_people(library: &mut LibraryService, joined: NaiveDate) -> Result<(), LibraryError> {
    for (id, name, email, phone, tier) in [
        (
            "M-100",
            "Basil Reader",
            "basil@example.org",
            "5550001000",
            MembershipType::Basic,
        ),
        (
            "M-200",
            "Priya Patron",
            "priya@example.org",
            "5550002000",
            MembershipType::Premium,
        ),
    ] {
        library.register_member(Member::new(id, name, email, phone, joined, tier))?;
    }

    library
        .authors_mut()
        .add(AuthorProfile::named("Joshua", "Bloch"))?;
    library
        .publishers_mut()
        .add(PublisherProfile::named("Addison-Wesley", "US"))?;
    Ok(())
}

fn render_summary(summary: &LibrarySummary) {
    println!("\nSummary as of {}", summary.as_of);
    println!(
        "- books: {} ({} with copies on the shelf)",
        summary.total_books, summary.available_books
    );
    println!(
        "- members: {} ({} active)",
        summary.total_members, summary.active_members
    );
    println!(
        "- loans: {} active | {} overdue",
        summary.active_loans, summary.overdue_loans
    );
    println!("- reservations: {} active", summary.active_reservations);
}
