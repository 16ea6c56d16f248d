//! Book lending client
//!
//! Session handling, collection synchronization and loan actions for the
//! book lending REST API. The `lending` binary is a command-line front-end
//! over this library.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod view;

pub use app::{App, AuthPage, Page};
pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
