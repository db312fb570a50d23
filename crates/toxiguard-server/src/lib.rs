//! Toxiguard Server
//!
//! HTTP API over the submission workflow and moderation reports, plus the
//! configuration and admin session handling the `toxiguard` binary uses.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod server;
pub mod state;

pub use crate::config::AppConfig;
pub use error::{AppError, AppResult};
pub use server::{build_app, run_server};
pub use state::AppState;
