//! Personalized recommendations

use super::sync::{DataSync, SyncSource};
use crate::{api::endpoints, models::Book};

pub const RECOMMENDATIONS_ERROR: &str = "Failed to fetch recommendations.";

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationsSource;

impl SyncSource for RecommendationsSource {
    type Item = Book;
    type Query = ();

    fn name(&self) -> &'static str {
        "recommendations"
    }

    fn path(&self, _: &()) -> String {
        endpoints::RECOMMENDATIONS.to_string()
    }

    fn requires_token(&self) -> bool {
        true
    }

    fn error_message(&self) -> &'static str {
        RECOMMENDATIONS_ERROR
    }
}

pub type RecommendationsSync = DataSync<RecommendationsSource>;
