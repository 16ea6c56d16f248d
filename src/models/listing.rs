//! Normalization of collection responses.
//!
//! List endpoints answer either with a paginated envelope
//! (`{"count": .., "next": .., "previous": .., "results": [..]}`) or with a
//! bare JSON array. Both are accepted; any other shape is a decode error.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Paginated envelope
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A collection response in one of the two accepted shapes
#[derive(Debug, Clone)]
pub enum Listing<T> {
    Paginated(PageEnvelope<T>),
    Flat(Vec<T>),
}

impl<T: DeserializeOwned> Listing<T> {
    pub fn from_value(value: Value) -> ClientResult<Self> {
        let enveloped = value.as_object().is_some_and(|map| map.contains_key("results"));

        match value {
            Value::Array(_) => Ok(Listing::Flat(serde_json::from_value(value)?)),
            Value::Object(_) if enveloped => Ok(Listing::Paginated(serde_json::from_value(value)?)),
            other => Err(ClientError::Decode(format!(
                "expected a list or a paginated envelope, got {}",
                kind_of(&other)
            ))),
        }
    }
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paginated(page) => page.results,
            Listing::Flat(items) => items,
        }
    }

    /// Total reported by the server, or the local length for flat lists
    pub fn total(&self) -> usize {
        match self {
            Listing::Paginated(page) => page
                .count
                .and_then(|c| usize::try_from(c).ok())
                .unwrap_or(page.results.len()),
            Listing::Flat(items) => items.len(),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without results",
    }
}
