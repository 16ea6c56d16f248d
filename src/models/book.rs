//! Book model and catalog filter types

use serde::{Deserialize, Serialize};

/// Book as served by the lending API.
///
/// Author and genre are flattened to their display names by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
    pub is_available: bool,
    #[serde(default)]
    pub read_count: i64,
}

impl Book {
    /// Label shown on the availability badge
    pub fn status_label(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Borrowed"
        }
    }
}

/// Availability tri-state used by the catalog filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Any,
    Available,
    Borrowed,
}

impl Availability {
    /// Query value for `is_available`, `None` when unfiltered
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            Availability::Any => None,
            Availability::Available => Some("true"),
            Availability::Borrowed => Some("false"),
        }
    }
}

impl From<Option<bool>> for Availability {
    fn from(v: Option<bool>) -> Self {
        match v {
            None => Availability::Any,
            Some(true) => Availability::Available,
            Some(false) => Availability::Borrowed,
        }
    }
}

/// Catalog filter. Empty fields are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookFilter {
    /// Author name fragment (`author__name`)
    pub author: String,
    /// Genre name fragment (`genre__name`)
    pub genre: String,
    pub availability: Availability,
}

impl BookFilter {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Non-empty query parameters, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if !self.author.is_empty() {
            pairs.push(("author__name", self.author.as_str()));
        }
        if !self.genre.is_empty() {
            pairs.push(("genre__name", self.genre.as_str()));
        }
        if let Some(value) = self.availability.as_query() {
            pairs.push(("is_available", value));
        }
        pairs
    }

    /// Url-encoded query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        // Any absolute base works, only the encoded query is kept
        match reqwest::Url::parse_with_params("http://localhost/", &pairs) {
            Ok(url) => url.query().unwrap_or_default().to_string(),
            Err(_) => String::new(),
        }
    }
}
