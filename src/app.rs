//! Application controller: which page is active and how the session
//! drives the collection syncs behind it.

use std::sync::Arc;

use crate::{
    api::{HttpClient, Transport},
    config::AppConfig,
    error::ClientResult,
    models::{AuthOutcome, BookFilter, BorrowedIndex, LoanAction, Notice, RegisterRequest},
    services::{
        storage::{FileTokenStorage, TokenStorage},
        Services,
    },
};

pub const REGISTER_SUCCESS: &str = "Registration successful! Please login.";
pub const REGISTER_FAILED: &str = "Registration failed.";
pub const LOGIN_FAILED: &str = "Failed to login.";

/// Pages available to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Books,
    MyBooks,
    Recommendations,
}

/// Pages shown without a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPage {
    #[default]
    Login,
    Register,
}

pub struct App {
    config: Arc<AppConfig>,
    services: Services,
    page: Page,
    auth_page: AuthPage,
    auth_message: Option<Notice>,
}

impl App {
    pub fn new(
        config: AppConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            services: Services::new(transport, storage),
            page: Page::default(),
            auth_page: AuthPage::default(),
            auth_message: None,
        }
    }

    /// Build the HTTP client and file-backed token storage from configuration
    pub fn from_config(config: AppConfig) -> ClientResult<Self> {
        let transport = Arc::new(HttpClient::new(&config.api)?);
        let storage = Arc::new(FileTokenStorage::new(config.storage_dir()));
        tracing::debug!("Session token stored in {}", storage.path().display());
        Ok(Self::new(config, transport, storage))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn authenticated(&self) -> bool {
        self.services.session.is_authenticated()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn auth_page(&self) -> AuthPage {
        self.auth_page
    }

    pub fn switch_auth_page(&mut self, page: AuthPage) {
        self.auth_page = page;
        self.auth_message = None;
    }

    /// Informational message on the auth pages (post-registration)
    pub fn auth_message(&self) -> Option<&Notice> {
        self.auth_message.as_ref()
    }

    /// Open `page` and, when a session exists, mount the borrowed-books
    /// sync and the page's own sync. Syncs that are already mounted only
    /// see the token change.
    pub async fn start(&mut self, page: Page) {
        self.page = page;
        if !self.authenticated() {
            return;
        }
        self.propagate_token().await;
        if !self.services.borrowed.is_mounted() {
            self.services.borrowed.mount().await;
        }
        self.mount_page(page).await;
    }

    async fn propagate_token(&self) {
        let token = self.services.session.token();
        self.services.catalog.set_token(token.clone()).await;
        self.services.recommendations.set_token(token.clone()).await;
        self.services.borrowed.set_token(token).await;
    }

    async fn mount_page(&self, page: Page) {
        match page {
            Page::Books if !self.services.catalog.is_mounted() => {
                self.services.catalog.mount().await
            }
            Page::Recommendations if !self.services.recommendations.is_mounted() => {
                self.services.recommendations.mount().await
            }
            _ => {}
        }
    }

    fn unmount_page(&self, page: Page) {
        match page {
            Page::Books => self.services.catalog.unmount(),
            Page::Recommendations => self.services.recommendations.unmount(),
            Page::MyBooks => {}
        }
    }

    /// Switch page. The new page refetches on mount.
    pub async fn show(&mut self, page: Page) {
        self.unmount_page(self.page);
        self.page = page;
        if self.authenticated() {
            self.mount_page(page).await;
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> AuthOutcome {
        match self.services.session.login(username, password).await {
            AuthOutcome::Success => {
                self.auth_message = None;
                self.start(self.page).await;
                AuthOutcome::Success
            }
            AuthOutcome::Failure { message } if message.is_empty() => {
                AuthOutcome::failure(LOGIN_FAILED)
            }
            failure => failure,
        }
    }

    /// Register. On success the success message is set and stays until
    /// [`App::finish_registration`] moves to the login page.
    pub async fn register(&mut self, request: &RegisterRequest) -> AuthOutcome {
        self.auth_message = None;

        match self.services.session.register(request).await {
            AuthOutcome::Success => {
                self.auth_message = Some(Notice::info(REGISTER_SUCCESS));
                AuthOutcome::Success
            }
            AuthOutcome::Failure { message } if message.is_empty() => {
                AuthOutcome::failure(REGISTER_FAILED)
            }
            failure => failure,
        }
    }

    /// Keep the post-registration message up for the configured delay, then
    /// clear it and switch to the login page. No-op without a pending message.
    pub async fn finish_registration(&mut self) {
        if self.auth_page != AuthPage::Register || self.auth_message.is_none() {
            return;
        }
        tokio::time::sleep(self.config.ui.register_redirect()).await;
        self.switch_auth_page(AuthPage::Login);
    }

    /// End the session. Every sync is unmounted so nothing refetches.
    pub async fn logout(&mut self) {
        self.services.catalog.unmount();
        self.services.recommendations.unmount();
        self.services.borrowed.unmount();
        self.services.session.logout();
        self.propagate_token().await;
        self.page = Page::default();
    }

    pub async fn set_filter(&self, filter: BookFilter) {
        self.services.catalog.set_query(filter).await;
    }

    pub async fn perform(&self, action: LoanAction, book_id: i64) -> Notice {
        self.services.loans.perform(action, book_id).await
    }

    pub fn notice(&self) -> Option<Notice> {
        self.services.loans.notice()
    }

    pub fn dismiss_notice(&self) {
        self.services.loans.dismiss();
    }

    pub fn borrowed_index(&self) -> BorrowedIndex {
        self.services.loans.borrowed_index()
    }
}
