//! HTTP access to the lending REST API

pub mod client;
pub mod endpoints;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientResult;

pub use client::HttpClient;

/// Outbound JSON transport.
///
/// `get` fails on any non-2xx status. `post` hands back the parsed body of
/// a 400 response so server-side validation messages reach the caller, and
/// fails on any other non-2xx status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, token: Option<String>) -> ClientResult<Value>;

    async fn post(&self, path: &str, body: &Value, token: Option<String>) -> ClientResult<Value>;
}
