use super::common::*;
use crate::domain::{Book, BookCategory, BookUpdate};
use crate::error::LibraryError;
use crate::ids::EntityKind;

fn update_for(copies: u32) -> BookUpdate {
    BookUpdate {
        title: "Effective Java (3rd ed.)".to_string(),
        author: "Joshua Bloch".to_string(),
        publisher: "Addison-Wesley".to_string(),
        publication_year: 2018,
        total_copies: copies,
        category: BookCategory::Technology,
    }
}

#[test]
fn add_validates_book_fields() {
    let clock = clock();
    let mut library = library_with(&clock);

    let cases = [
        (
            Book::new("12345", "T", "A", "P", 2000, 1, BookCategory::Fiction),
            "Invalid ISBN format: 12345",
        ),
        (
            Book::new(EFFECTIVE_JAVA, "  ", "A", "P", 2000, 1, BookCategory::Fiction),
            "Title cannot be empty",
        ),
        (
            Book::new(EFFECTIVE_JAVA, "T", "", "P", 2000, 1, BookCategory::Fiction),
            "Author cannot be empty",
        ),
        (
            Book::new(EFFECTIVE_JAVA, "T", "A", "P", 2000, 0, BookCategory::Fiction),
            "Total copies must be positive",
        ),
        (
            Book::new(EFFECTIVE_JAVA, "T", "A", "P", 2027, 1, BookCategory::Fiction),
            "Invalid publication year: 2027",
        ),
    ];

    for (book, expected) in cases {
        match library.add_book(book) {
            Err(LibraryError::InvalidInput(message)) => assert_eq!(message, expected),
            other => panic!("expected invalid input '{expected}', got {other:?}"),
        }
    }
    assert_eq!(library.total_books(), 0);

    library
        .add_book(Book::new(
            EFFECTIVE_JAVA,
            "Next Year",
            "A",
            "P",
            2026,
            1,
            BookCategory::Fiction,
        ))
        .expect("next year's titles are accepted");
}

#[test]
fn duplicate_isbn_is_rejected_without_overwriting() {
    let (mut library, _) = stocked_library();
    library
        .issue_book(&member_id("M-1"), EFFECTIVE_JAVA)
        .expect("loan issued");

    let err = library
        .add_book(effective_java(10))
        .expect_err("duplicate rejected");
    assert!(matches!(err, LibraryError::InvalidInput(ref m) if m.contains("already exists")));

    let book = library.find_book(EFFECTIVE_JAVA).expect("still present");
    assert_eq!(book.total_copies, 5);
    assert_eq!(book.available_copies(), 4);
}

#[test]
fn added_books_start_fully_shelved() {
    let clock = clock();
    let mut library = library_with(&clock);

    let mut shrunk = effective_java(5);
    shrunk.total_copies = 1;
    let mut borrowed = lunar_notes(3);
    assert!(borrowed.borrow_copy());

    let stored = library.add_book(shrunk).expect("shrunk book added");
    assert_eq!((stored.total_copies, stored.available_copies()), (1, 1));
    let stored = library.add_book(borrowed).expect("borrowed book added");
    assert_eq!((stored.total_copies, stored.available_copies()), (3, 3));

    let removed = library.remove_book(EFFECTIVE_JAVA).expect("nothing on loan");
    assert_eq!(removed.copies_on_loan(), 0);
}

#[test]
fn find_reports_missing_isbn() {
    let (library, _) = stocked_library();
    assert_eq!(
        library.find_book("9999999999").expect_err("missing"),
        LibraryError::NotFound {
            kind: EntityKind::Book,
            id: "9999999999".to_string()
        }
    );
}

#[test]
fn searches_are_case_insensitive_and_ordered() {
    let (mut library, _) = stocked_library();
    library
        .add_book(Book::new(
            "0-306-40615-2",
            "Java Concurrency in Practice",
            "Brian Goetz",
            "Addison-Wesley",
            2006,
            2,
            BookCategory::Technology,
        ))
        .expect("third book added");

    let titles: Vec<_> = library
        .search_books_by_title("JAVA")
        .into_iter()
        .map(|book| book.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Effective Java", "Java Concurrency in Practice"]);

    assert_eq!(library.search_books_by_author("jemison").len(), 1);
    assert!(library.search_books_by_title("   ").is_empty());
    assert!(library.search_books_by_author("").is_empty());

    assert_eq!(library.books_by_category(BookCategory::Technology).len(), 2);
    assert!(library.books_by_category(BookCategory::Children).is_empty());
}

#[test]
fn available_excludes_fully_lent_titles() {
    let (mut library, _) = stocked_library();
    library
        .issue_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("last copy lent");

    let available: Vec<_> = library
        .available_books()
        .into_iter()
        .map(|book| book.isbn.as_str())
        .collect();
    assert_eq!(available, vec![EFFECTIVE_JAVA]);
}

#[test]
fn update_shifts_available_copies_with_total() {
    let (mut library, _) = stocked_library();
    library
        .issue_book(&member_id("M-1"), EFFECTIVE_JAVA)
        .expect("first loan");
    library
        .issue_book(&member_id("M-2"), EFFECTIVE_JAVA)
        .expect("second loan");

    let book = library
        .update_book(EFFECTIVE_JAVA, update_for(7))
        .expect("grow");
    assert_eq!(book.title, "Effective Java (3rd ed.)");
    assert_eq!((book.total_copies, book.available_copies()), (7, 5));

    let book = library
        .update_book(EFFECTIVE_JAVA, update_for(2))
        .expect("shrink to the loans out");
    assert_eq!((book.total_copies, book.available_copies()), (2, 0));

    let err = library
        .update_book(EFFECTIVE_JAVA, update_for(1))
        .expect_err("cannot drop below loans out");
    assert!(matches!(err, LibraryError::InvalidInput(_)));
    assert_eq!(
        library.find_book(EFFECTIVE_JAVA).expect("present").total_copies,
        2
    );
}

#[test]
fn update_and_remove_report_missing_books() {
    let (mut library, _) = stocked_library();
    assert!(matches!(
        library.update_book("9999999999", update_for(1)),
        Err(LibraryError::NotFound { .. })
    ));
    assert!(matches!(
        library.remove_book("9999999999"),
        Err(LibraryError::NotFound { .. })
    ));
}

#[test]
fn remove_refuses_titles_with_copies_out() {
    let (mut library, _) = stocked_library();
    let loan_id = library
        .issue_book(&member_id("M-1"), LUNAR_NOTES)
        .expect("loan issued")
        .loan_id
        .clone();

    assert!(matches!(
        library.remove_book(LUNAR_NOTES),
        Err(LibraryError::InvalidInput(_))
    ));

    library.return_book(&loan_id).expect("returned");
    let removed = library.remove_book(LUNAR_NOTES).expect("removable now");
    assert_eq!(removed.isbn, LUNAR_NOTES);
    assert_eq!(library.total_books(), 1);
}
