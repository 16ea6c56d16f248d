//! reqwest-backed implementation of [`Transport`]

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::Transport;
use crate::{
    config::ApiConfig,
    error::{ClientError, ClientResult},
};

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for the API rooted at `config.base_url`
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn decode(response: Response) -> ClientResult<Value> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, path: &str, token: Option<String>) -> ClientResult<Value> {
        let response = self
            .request(Method::GET, path, token.as_deref())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("GET {} -> {}", path, status);

        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Self::decode(response).await
    }

    async fn post(&self, path: &str, body: &Value, token: Option<String>) -> ClientResult<Value> {
        let response = self
            .request(Method::POST, path, token.as_deref())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("POST {} -> {}", path, status);

        // 400 carries validation messages meant for the user
        if !status.is_success() && status != StatusCode::BAD_REQUEST {
            return Err(ClientError::Status(status.as_u16()));
        }
        Self::decode(response).await
    }
}
