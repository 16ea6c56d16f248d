//! Book reviews

use std::sync::Arc;

use super::session::SessionStore;
use crate::{
    api::{endpoints, Transport},
    error::{ClientError, ClientResult},
    models::{
        review::{MAX_RATING, MIN_RATING},
        Listing, NewReview, Review,
    },
};

/// Outcome of a review submission
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    Created(Review),
    /// Rejected by the server; carries the serialized response body
    Rejected(String),
}

#[derive(Clone)]
pub struct ReviewsService {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl ReviewsService {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Reviews of a book
    pub async fn list(&self, book_id: i64) -> ClientResult<Vec<Review>> {
        let body = self
            .transport
            .get(&endpoints::reviews(book_id), self.session.token())
            .await?;
        Ok(Listing::from_value(body)?.into_items())
    }

    /// Review a book. One review per user and book is enforced server-side.
    pub async fn create(
        &self,
        book_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> ClientResult<ReviewOutcome> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ClientError::Validation(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        let body = serde_json::to_value(NewReview { rating, comment })?;
        let data = self
            .transport
            .post(&endpoints::create_review(book_id), &body, self.session.token())
            .await?;

        match serde_json::from_value::<Review>(data.clone()) {
            Ok(review) => Ok(ReviewOutcome::Created(review)),
            Err(_) => Ok(ReviewOutcome::Rejected(data.to_string())),
        }
    }
}
