use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AuthorProfile, BookCategory, BookUpdate, Loan, LoanStatus, MemberUpdate, NewBook, NewMember,
    PublisherProfile,
};
use crate::error::LibraryError;
use crate::ids::{AuthorId, LoanId, MemberId, PublisherId, ReservationId};
use crate::services::LibraryService;

/// The façade shared across request handlers. Handlers hold the lock for one
/// synchronous operation only.
pub type SharedLibrary = Arc<Mutex<LibraryService>>;

pub fn shared(library: LibraryService) -> SharedLibrary {
    Arc::new(Mutex::new(library))
}

/// Router exposing the circulation API under `/api/v1`.
pub fn library_router(library: SharedLibrary) -> Router {
    Router::new()
        .route("/api/v1/books", post(create_book).get(list_books))
        .route(
            "/api/v1/books/:isbn",
            get(get_book).put(update_book).delete(remove_book),
        )
        .route("/api/v1/books/:isbn/reservations", get(book_reservations))
        .route("/api/v1/members", post(register_member).get(active_members))
        .route("/api/v1/members/:member_id", get(get_member).put(update_member))
        .route(
            "/api/v1/members/:member_id/deactivate",
            post(deactivate_member),
        )
        .route("/api/v1/members/:member_id/loans", get(member_loans))
        .route(
            "/api/v1/members/:member_id/loans/active",
            get(member_active_loans),
        )
        .route(
            "/api/v1/members/:member_id/reservations",
            get(member_reservations),
        )
        .route("/api/v1/loans", post(issue_loan))
        .route("/api/v1/loans/overdue", get(overdue_loans))
        .route("/api/v1/loans/:loan_id", get(get_loan))
        .route("/api/v1/loans/:loan_id/return", post(return_loan))
        .route("/api/v1/loans/:loan_id/cancel", post(cancel_loan))
        .route("/api/v1/reservations", post(create_reservation))
        .route("/api/v1/reservations/expired", get(expired_reservations))
        .route(
            "/api/v1/reservations/expired/process",
            post(process_expired_reservations),
        )
        .route("/api/v1/reservations/:reservation_id", get(get_reservation))
        .route(
            "/api/v1/reservations/:reservation_id/cancel",
            post(cancel_reservation),
        )
        .route(
            "/api/v1/reservations/:reservation_id/fulfill",
            post(fulfill_reservation),
        )
        .route("/api/v1/authors", post(create_author).get(list_authors))
        .route("/api/v1/authors/:author_id", get(get_author).put(update_author))
        .route(
            "/api/v1/authors/:author_id/deactivate",
            post(deactivate_author),
        )
        .route(
            "/api/v1/publishers",
            post(create_publisher).get(list_publishers),
        )
        .route(
            "/api/v1/publishers/:publisher_id",
            get(get_publisher).put(update_publisher),
        )
        .route(
            "/api/v1/publishers/:publisher_id/deactivate",
            post(deactivate_publisher),
        )
        .route("/api/v1/stats", get(stats))
        .with_state(library)
}

fn lock(library: &SharedLibrary) -> MutexGuard<'_, LibraryService> {
    library.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reply<T: Serialize>(status: StatusCode, result: Result<T, LibraryError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// A loan as seen on `today`: the stored record plus derived overdue state.
#[derive(Debug, Serialize)]
pub struct LoanView<'a> {
    #[serde(flatten)]
    pub loan: &'a Loan,
    pub effective_status: LoanStatus,
    pub days_overdue: i64,
    pub accrued_fine: f64,
}

impl<'a> LoanView<'a> {
    pub fn new(library: &LibraryService, loan: &'a Loan, today: NaiveDate) -> Self {
        Self {
            loan,
            effective_status: loan.effective_status(today),
            days_overdue: loan.days_overdue(today),
            accrued_fine: library.calculate_fine(loan),
        }
    }
}

fn loan_views<'a>(library: &LibraryService, loans: Vec<&'a Loan>) -> Vec<LoanView<'a>> {
    let today = library.today();
    loans
        .into_iter()
        .map(|loan| LoanView::new(library, loan, today))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub member_id: MemberId,
    pub isbn: String,
}

#[derive(Debug, Deserialize)]
pub struct ReservationRequest {
    pub member_id: MemberId,
    pub isbn: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

// Books

async fn create_book(
    State(library): State<SharedLibrary>,
    Json(payload): Json<NewBook>,
) -> Response {
    let mut library = lock(&library);
    reply(StatusCode::CREATED, library.add_book(payload.into()))
}

async fn list_books(
    State(library): State<SharedLibrary>,
    Query(query): Query<BookQuery>,
) -> Response {
    let library = lock(&library);

    let books = if let Some(title) = query.title.as_deref() {
        library.search_books_by_title(title)
    } else if let Some(author) = query.author.as_deref() {
        library.search_books_by_author(author)
    } else if let Some(category) = query.category.as_deref() {
        match category.parse::<BookCategory>() {
            Ok(category) => library.books_by_category(category),
            Err(message) => return LibraryError::InvalidInput(message).into_response(),
        }
    } else if query.available.unwrap_or(false) {
        library.available_books()
    } else {
        library.catalog().all()
    };

    (StatusCode::OK, Json(books)).into_response()
}

async fn get_book(State(library): State<SharedLibrary>, Path(isbn): Path<String>) -> Response {
    let library = lock(&library);
    reply(StatusCode::OK, library.find_book(&isbn))
}

async fn update_book(
    State(library): State<SharedLibrary>,
    Path(isbn): Path<String>,
    Json(update): Json<BookUpdate>,
) -> Response {
    let mut library = lock(&library);
    reply(StatusCode::OK, library.update_book(&isbn, update))
}

async fn remove_book(State(library): State<SharedLibrary>, Path(isbn): Path<String>) -> Response {
    let mut library = lock(&library);
    reply(StatusCode::OK, library.remove_book(&isbn))
}

async fn book_reservations(
    State(library): State<SharedLibrary>,
    Path(isbn): Path<String>,
) -> Response {
    let library = lock(&library);
    let result = library
        .find_book(&isbn)
        .map(|_| library.reservations_for_book(&isbn));
    reply(StatusCode::OK, result)
}

// Members

async fn register_member(
    State(library): State<SharedLibrary>,
    Json(payload): Json<NewMember>,
) -> Response {
    let mut library = lock(&library);
    reply(StatusCode::CREATED, library.enroll(payload))
}

async fn active_members(State(library): State<SharedLibrary>) -> Response {
    let library = lock(&library);
    (StatusCode::OK, Json(library.active_members())).into_response()
}

async fn get_member(
    State(library): State<SharedLibrary>,
    Path(member_id): Path<String>,
) -> Response {
    let library = lock(&library);
    reply(StatusCode::OK, library.find_member(&MemberId(member_id)))
}

async fn update_member(
    State(library): State<SharedLibrary>,
    Path(member_id): Path<String>,
    Json(update): Json<MemberUpdate>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library.update_member(&MemberId(member_id), update),
    )
}

async fn deactivate_member(
    State(library): State<SharedLibrary>,
    Path(member_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library.deactivate_member(&MemberId(member_id)),
    )
}

async fn member_loans(
    State(library): State<SharedLibrary>,
    Path(member_id): Path<String>,
) -> Response {
    let library = lock(&library);
    let member_id = MemberId(member_id);
    let result = library
        .find_member(&member_id)
        .map(|_| loan_views(&library, library.loan_history(&member_id)));
    reply(StatusCode::OK, result)
}

async fn member_active_loans(
    State(library): State<SharedLibrary>,
    Path(member_id): Path<String>,
) -> Response {
    let library = lock(&library);
    let member_id = MemberId(member_id);
    let result = library
        .find_member(&member_id)
        .map(|_| loan_views(&library, library.active_loans_by_member(&member_id)));
    reply(StatusCode::OK, result)
}

async fn member_reservations(
    State(library): State<SharedLibrary>,
    Path(member_id): Path<String>,
) -> Response {
    let library = lock(&library);
    let member_id = MemberId(member_id);
    let result = library
        .find_member(&member_id)
        .map(|_| library.active_reservations_by_member(&member_id));
    reply(StatusCode::OK, result)
}

// Loans

async fn issue_loan(
    State(library): State<SharedLibrary>,
    Json(request): Json<LoanRequest>,
) -> Response {
    let mut library = lock(&library);
    let loan_id = match library.issue_book(&request.member_id, &request.isbn) {
        Ok(loan) => loan.loan_id.clone(),
        Err(err) => return err.into_response(),
    };
    loan_response(&library, StatusCode::CREATED, &loan_id)
}

async fn overdue_loans(State(library): State<SharedLibrary>) -> Response {
    let library = lock(&library);
    let views = loan_views(&library, library.overdue_loans());
    (StatusCode::OK, Json(views)).into_response()
}

async fn get_loan(State(library): State<SharedLibrary>, Path(loan_id): Path<String>) -> Response {
    let library = lock(&library);
    loan_response(&library, StatusCode::OK, &LoanId(loan_id))
}

async fn return_loan(
    State(library): State<SharedLibrary>,
    Path(loan_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    let loan_id = LoanId(loan_id);
    if let Err(err) = library.return_book(&loan_id) {
        return err.into_response();
    }
    loan_response(&library, StatusCode::OK, &loan_id)
}

async fn cancel_loan(
    State(library): State<SharedLibrary>,
    Path(loan_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    let loan_id = LoanId(loan_id);
    if let Err(err) = library.cancel_loan(&loan_id) {
        return err.into_response();
    }
    loan_response(&library, StatusCode::OK, &loan_id)
}

fn loan_response(library: &LibraryService, status: StatusCode, loan_id: &LoanId) -> Response {
    let today = library.today();
    let result = library
        .find_loan(loan_id)
        .map(|loan| LoanView::new(library, loan, today));
    reply(status, result)
}

// Reservations

async fn create_reservation(
    State(library): State<SharedLibrary>,
    Json(request): Json<ReservationRequest>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::CREATED,
        library.reserve_book(&request.member_id, &request.isbn),
    )
}

async fn expired_reservations(State(library): State<SharedLibrary>) -> Response {
    let library = lock(&library);
    (StatusCode::OK, Json(library.expired_reservations())).into_response()
}

async fn process_expired_reservations(State(library): State<SharedLibrary>) -> Response {
    let mut library = lock(&library);
    let processed = library.process_expired_reservations();
    (StatusCode::OK, Json(json!({ "processed": processed }))).into_response()
}

async fn get_reservation(
    State(library): State<SharedLibrary>,
    Path(reservation_id): Path<String>,
) -> Response {
    let library = lock(&library);
    reply(
        StatusCode::OK,
        library.find_reservation(&ReservationId(reservation_id)),
    )
}

async fn cancel_reservation(
    State(library): State<SharedLibrary>,
    Path(reservation_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library.cancel_reservation(&ReservationId(reservation_id)),
    )
}

async fn fulfill_reservation(
    State(library): State<SharedLibrary>,
    Path(reservation_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library.fulfill_reservation(&ReservationId(reservation_id)),
    )
}

// Authors and publishers

async fn create_author(
    State(library): State<SharedLibrary>,
    Json(profile): Json<AuthorProfile>,
) -> Response {
    let mut library = lock(&library);
    reply(StatusCode::CREATED, library.authors_mut().add(profile))
}

/// `?name=` searches first and last names; without it, active authors.
async fn list_authors(
    State(library): State<SharedLibrary>,
    Query(query): Query<NameQuery>,
) -> Response {
    let library = lock(&library);
    let authors = match query.name.as_deref() {
        Some(name) => library.authors().search_by_name(name),
        None => library.authors().active(),
    };
    (StatusCode::OK, Json(authors)).into_response()
}

async fn get_author(
    State(library): State<SharedLibrary>,
    Path(author_id): Path<String>,
) -> Response {
    let library = lock(&library);
    reply(StatusCode::OK, library.authors().find(&AuthorId(author_id)))
}

async fn update_author(
    State(library): State<SharedLibrary>,
    Path(author_id): Path<String>,
    Json(profile): Json<AuthorProfile>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library.authors_mut().update(&AuthorId(author_id), profile),
    )
}

async fn deactivate_author(
    State(library): State<SharedLibrary>,
    Path(author_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library.authors_mut().deactivate(&AuthorId(author_id)),
    )
}

async fn create_publisher(
    State(library): State<SharedLibrary>,
    Json(profile): Json<PublisherProfile>,
) -> Response {
    let mut library = lock(&library);
    reply(StatusCode::CREATED, library.publishers_mut().add(profile))
}

async fn list_publishers(
    State(library): State<SharedLibrary>,
    Query(query): Query<NameQuery>,
) -> Response {
    let library = lock(&library);
    let publishers = match query.name.as_deref() {
        Some(name) => library.publishers().search_by_name(name),
        None => library.publishers().active(),
    };
    (StatusCode::OK, Json(publishers)).into_response()
}

async fn get_publisher(
    State(library): State<SharedLibrary>,
    Path(publisher_id): Path<String>,
) -> Response {
    let library = lock(&library);
    reply(
        StatusCode::OK,
        library.publishers().find(&PublisherId(publisher_id)),
    )
}

async fn update_publisher(
    State(library): State<SharedLibrary>,
    Path(publisher_id): Path<String>,
    Json(profile): Json<PublisherProfile>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library
            .publishers_mut()
            .update(&PublisherId(publisher_id), profile),
    )
}

async fn deactivate_publisher(
    State(library): State<SharedLibrary>,
    Path(publisher_id): Path<String>,
) -> Response {
    let mut library = lock(&library);
    reply(
        StatusCode::OK,
        library
            .publishers_mut()
            .deactivate(&PublisherId(publisher_id)),
    )
}

async fn stats(State(library): State<SharedLibrary>) -> Response {
    let library = lock(&library);
    (StatusCode::OK, Json(library.summary())).into_response()
}
