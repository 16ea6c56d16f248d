//! Session store: current token, its persistence, login/register/logout

use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::storage::TokenStorage;
use crate::{
    api::{endpoints, Transport},
    models::{AuthOutcome, Credentials, RegisterRequest, UserProfile},
};

pub const LOGIN_FAILED: &str = "Login failed.";
pub const LOGIN_ERROR: &str = "Please check your login Credentials";
pub const REGISTER_ERROR: &str = "An error occurred.";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
}

pub struct SessionStore {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn TokenStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Open a session, restoring any token left by a previous run
    pub fn open(transport: Arc<dyn Transport>, storage: Arc<dyn TokenStorage>) -> Self {
        let token = storage.load().unwrap_or_else(|e| {
            tracing::warn!("Could not restore session token: {}", e);
            None
        });
        if token.is_some() {
            tracing::debug!("Restored persisted session token");
        }

        Self {
            transport,
            storage,
            state: RwLock::new(SessionState { token, user: None }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    /// Replace the token, mirroring the change to durable storage
    pub fn set_token(&self, token: Option<String>) {
        let persisted = match &token {
            Some(t) => self.storage.store(t),
            None => self.storage.clear(),
        };
        if let Err(e) = persisted {
            tracing::error!("Failed to persist session token: {}", e);
        }
        self.write().token = token;
    }

    /// Authenticate against the API and keep the issued access token
    pub async fn login(&self, username: &str, password: &str) -> AuthOutcome {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = match serde_json::to_value(&credentials) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to encode login request: {}", e);
                return AuthOutcome::failure(LOGIN_ERROR);
            }
        };

        let data = match self.transport.post(endpoints::LOGIN, &body, None).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Login request failed: {}", e);
                return AuthOutcome::failure(LOGIN_ERROR);
            }
        };

        match non_empty_str(&data, "access") {
            Some(access) => {
                self.set_token(Some(access.to_string()));
                self.write().user = Some(UserProfile {
                    username: username.to_string(),
                });
                tracing::info!("Logged in as {}", username);
                AuthOutcome::Success
            }
            None => {
                let message = non_empty_str(&data, "detail").unwrap_or(LOGIN_FAILED);
                AuthOutcome::failure(message)
            }
        }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        let body = match serde_json::to_value(request) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to encode registration request: {}", e);
                return AuthOutcome::failure(REGISTER_ERROR);
            }
        };

        match self.transport.post(endpoints::REGISTER, &body, None).await {
            Ok(data) if non_empty_str(&data, "username").is_some() => {
                tracing::info!("Registered account {}", request.username);
                AuthOutcome::Success
            }
            // The raw body is the best diagnostic we have
            Ok(data) => AuthOutcome::failure(data.to_string()),
            Err(e) => {
                tracing::warn!("Registration request failed: {}", e);
                AuthOutcome::failure(REGISTER_ERROR)
            }
        }
    }

    /// Drop the token and cached profile. No network call.
    pub fn logout(&self) {
        self.set_token(None);
        self.write().user = None;
        tracing::info!("Logged out");
    }
}

fn non_empty_str<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
