//! Field format checks shared by every mutating operation.

use crate::error::LibraryError;
use regex::Regex;
use std::sync::OnceLock;

pub const EARLIEST_PUBLICATION_YEAR: i32 = 1000;

fn isbn_label() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^ISBN(?:-1[03])?:? ").expect("ISBN label pattern"))
}

fn isbn_body() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:97[89][- ]?)?[0-9]{1,5}[- ]?[0-9]+[- ]?[0-9]+[- ]?[0-9X]$")
            .expect("ISBN body pattern")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"))
}

pub fn validate_not_empty(value: &str, field: &str) -> Result<(), LibraryError> {
    if value.trim().is_empty() {
        return Err(LibraryError::invalid(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Accepts ISBN-10 and ISBN-13 in bare, hyphenated or spaced form, with an
/// optional `ISBN`, `ISBN-10` or `ISBN-13` label. Check digits are not verified.
pub fn is_valid_isbn(candidate: &str) -> bool {
    let body = match isbn_label().find(candidate) {
        Some(label) => &candidate[label.end()..],
        None => candidate,
    };

    has_isbn_shape(body) && isbn_body().is_match(body)
}

fn has_isbn_shape(body: &str) -> bool {
    let bytes = body.as_bytes();
    let digits_or_x = |b: &u8| b.is_ascii_digit() || *b == b'X';
    let separated = |b: &u8| b.is_ascii_digit() || *b == b'-' || *b == b' ';

    match bytes.len() {
        10 => bytes.iter().all(digits_or_x),
        13 if bytes.iter().all(u8::is_ascii_digit) => {
            body.starts_with("978") || body.starts_with("979")
        }
        13 => {
            bytes.iter().all(|b| separated(b) || *b == b'X') && leading_groups(bytes) >= 3
        }
        17 => bytes.iter().all(separated) && leading_groups(bytes) >= 4,
        _ => false,
    }
}

/// Number of `digits + separator` runs at the start of an ISBN body.
fn leading_groups(bytes: &[u8]) -> usize {
    let mut groups = 0;
    let mut digits = 0;
    for byte in bytes {
        match byte {
            b'0'..=b'9' => digits += 1,
            b'-' | b' ' if digits > 0 => {
                groups += 1;
                digits = 0;
            }
            _ => break,
        }
    }
    groups
}

pub fn validate_isbn(isbn: &str) -> Result<(), LibraryError> {
    validate_not_empty(isbn, "ISBN")?;
    if !is_valid_isbn(isbn) {
        return Err(LibraryError::invalid(format!("Invalid ISBN format: {isbn}")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), LibraryError> {
    validate_not_empty(email, "Email")?;
    if !email_pattern().is_match(email) {
        return Err(LibraryError::invalid(format!("Invalid email format: {email}")));
    }
    Ok(())
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), LibraryError> {
    validate_not_empty(phone_number, "Phone number")?;
    if !phone_pattern().is_match(phone_number) {
        return Err(LibraryError::invalid(format!(
            "Invalid phone number format: {phone_number}"
        )));
    }
    Ok(())
}

pub fn validate_positive(value: i64, field: &str) -> Result<(), LibraryError> {
    if value <= 0 {
        return Err(LibraryError::invalid(format!("{field} must be positive")));
    }
    Ok(())
}

pub fn validate_non_negative(value: i64, field: &str) -> Result<(), LibraryError> {
    if value < 0 {
        return Err(LibraryError::invalid(format!("{field} cannot be negative")));
    }
    Ok(())
}

/// Publication years run from 1000 through next year.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), LibraryError> {
    if !(EARLIEST_PUBLICATION_YEAR..=current_year + 1).contains(&year) {
        return Err(LibraryError::invalid(format!(
            "Invalid publication year: {year}"
        )));
    }
    Ok(())
}
