//! gitrends dashboard - app shell over the graph engine
//!
//! Fetches analytics records over HTTP, hands them to the
//! `gitrends-graph` widgets and shows one view at a time.

pub mod api;
pub mod app;
pub mod config;
pub mod detail;
pub mod error;
pub mod pending;
pub mod views;

pub use app::GitrendsApp;
pub use config::AppConfig;
pub use error::ApiError;
