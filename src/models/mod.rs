//! Data models for the lending client

pub mod book;
pub mod listing;
pub mod loan;
pub mod notice;
pub mod review;
pub mod user;

// Re-export commonly used types
pub use book::{Availability, Book, BookFilter};
pub use listing::{Listing, PageEnvelope};
pub use loan::{BorrowedIndex, BorrowedRecord, LoanAction};
pub use notice::Notice;
pub use review::{NewReview, Review};
pub use user::{AuthOutcome, Credentials, RegisterRequest, UserProfile};
