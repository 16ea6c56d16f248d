//! Loan management: the borrowed-books collection and borrow/return actions

use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{
    session::SessionStore,
    sync::{DataSync, SyncSource},
};
use crate::{
    api::{endpoints, Transport},
    models::{BorrowedIndex, BorrowedRecord, LoanAction, Notice},
};

pub const BORROWED_ERROR: &str = "Failed to fetch borrowed books.";

/// `/my-borrowed-books/`, the only source of truth for "my books"
#[derive(Debug, Clone, Copy, Default)]
pub struct BorrowedSource;

impl SyncSource for BorrowedSource {
    type Item = BorrowedRecord;
    type Query = ();

    fn name(&self) -> &'static str {
        "borrowed"
    }

    fn path(&self, _: &()) -> String {
        endpoints::MY_BORROWED_BOOKS.to_string()
    }

    fn requires_token(&self) -> bool {
        true
    }

    fn error_message(&self) -> &'static str {
        BORROWED_ERROR
    }
}

pub type BorrowedSync = DataSync<BorrowedSource>;

/// Performs borrow/return and resynchronizes the borrowed-books list.
///
/// Local book state is never patched; whether a book is borrowed is only
/// known after the next successful borrowed-books fetch.
#[derive(Clone)]
pub struct LoansService {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    borrowed: Arc<BorrowedSync>,
    notice: Arc<Mutex<Option<Notice>>>,
}

impl LoansService {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        borrowed: Arc<BorrowedSync>,
    ) -> Self {
        Self {
            transport,
            session,
            borrowed,
            notice: Arc::new(Mutex::new(None)),
        }
    }

    fn notice_slot(&self) -> MutexGuard<'_, Option<Notice>> {
        self.notice.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn borrowed(&self) -> &Arc<BorrowedSync> {
        &self.borrowed
    }

    /// Index of the current borrowed-books collection
    pub fn borrowed_index(&self) -> BorrowedIndex {
        self.borrowed.with_data(|records| records.iter().collect())
    }

    /// Notice left by the last action, until dismissed
    pub fn notice(&self) -> Option<Notice> {
        self.notice_slot().clone()
    }

    pub fn dismiss(&self) {
        *self.notice_slot() = None;
    }

    /// Borrow or return a book and report the outcome as a notice
    pub async fn perform(&self, action: LoanAction, book_id: i64) -> Notice {
        let path = endpoints::loan_action(book_id, action);

        let notice = match self
            .transport
            .post(&path, &json!({}), self.session.token())
            .await
        {
            Ok(result) => match result.get("message").and_then(non_empty) {
                Some(message) => {
                    tracing::info!("{} of book {}: {}", action, book_id, message);
                    let notice = Notice::info(message);
                    self.borrowed.refresh().await;
                    notice
                }
                None => {
                    let message = result
                        .get("error")
                        .and_then(non_empty)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Failed to {} book.", action));
                    Notice::error(message)
                }
            },
            Err(e) => {
                tracing::warn!("{} of book {} failed: {}", action, book_id, e);
                Notice::error(format!("An error occurred during the {} action.", action))
            }
        };

        *self.notice_slot() = Some(notice.clone());
        notice
    }
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
