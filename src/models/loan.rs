//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::book::Book;

/// Active loan held by the current user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedRecord {
    pub book: Book,
    #[serde(default)]
    pub borrowed_at: Option<DateTime<Utc>>,
}

/// Mutating loan actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAction {
    Borrow,
    Return,
}

impl LoanAction {
    /// Path segment of the action endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanAction::Borrow => "borrow",
            LoanAction::Return => "return",
        }
    }
}

impl fmt::Display for LoanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed records indexed by book id
#[derive(Debug, Clone, Default)]
pub struct BorrowedIndex {
    by_book: HashMap<i64, BorrowedRecord>,
}

impl BorrowedIndex {
    pub fn is_borrowed(&self, book_id: i64) -> bool {
        self.by_book.contains_key(&book_id)
    }

    pub fn get(&self, book_id: i64) -> Option<&BorrowedRecord> {
        self.by_book.get(&book_id)
    }

    pub fn len(&self) -> usize {
        self.by_book.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_book.is_empty()
    }
}

impl<'a> FromIterator<&'a BorrowedRecord> for BorrowedIndex {
    fn from_iter<I: IntoIterator<Item = &'a BorrowedRecord>>(iter: I) -> Self {
        Self {
            by_book: iter
                .into_iter()
                .map(|record| (record.book.id, record.clone()))
                .collect(),
        }
    }
}
