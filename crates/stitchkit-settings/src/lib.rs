//! StitchKit Settings Crate
//!
//! Handles chart editor configuration and settings persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{ChartSettings, ChartStyleSetting, ColorSettings, Config, EditorSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
