// Typing practice for Korean and English: Hangul decomposition and
// composition, live typing statistics, text generation, tiers and the TUI.
// The binary in main.rs drives `app::App`; benches and integration tests use
// the modules directly.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod hangul;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;

pub use error::{Error, Result};
