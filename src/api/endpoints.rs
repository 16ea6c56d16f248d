//! Endpoint paths, relative to the configured base URL

use crate::models::{BookFilter, LoanAction};

pub const LOGIN: &str = "/login/";
pub const REGISTER: &str = "/register/";
pub const MY_BORROWED_BOOKS: &str = "/my-borrowed-books/";
pub const RECOMMENDATIONS: &str = "/recommendations/";

/// Catalog listing, e.g. `/books/?genre__name=Poetry`
pub fn books(filter: &BookFilter) -> String {
    format!("/books/?{}", filter.to_query_string())
}

pub fn loan_action(book_id: i64, action: LoanAction) -> String {
    format!("/books/{}/{}/", book_id, action.as_str())
}

pub fn reviews(book_id: i64) -> String {
    format!("/books/{}/reviews/", book_id)
}

pub fn create_review(book_id: i64) -> String {
    format!("/books/{}/reviews/create/", book_id)
}
