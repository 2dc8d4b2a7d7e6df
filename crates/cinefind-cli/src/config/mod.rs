//! Application configuration module.
//!
//! Manages the TOML config file holding search tuning, catalog
//! overrides, and the trending list size.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
