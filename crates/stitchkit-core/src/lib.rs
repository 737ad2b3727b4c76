//! # StitchKit Core
//!
//! Core types, traits, and utilities shared by the StitchKit crates.
//! Provides the error types, the color model, chart change events with the
//! event bus that delivers them, and the defaults provider contract used to
//! seed newly created cells.

pub mod color;
pub mod constants;
pub mod defaults;
pub mod error;
pub mod event_bus;

pub use color::Color;
pub use defaults::{DefaultsProvider, StaticDefaults};
pub use error::{Error, Result};

// Re-export event bus for convenience
pub use event_bus::{
    ChartEvent, ColorRole, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    ItemId, SubscriptionId,
};
