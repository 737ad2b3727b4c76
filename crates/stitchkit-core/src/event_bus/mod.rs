//! # Event Bus Module
//!
//! Typed change notifications from the chart engine to its host.
//!
//! ## Usage
//!
//! ```rust
//! use stitchkit_core::event_bus::{ChartEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Row]),
//!     |event| {
//!         if let ChartEvent::RowSelected { row } = event {
//!             println!("row {} selected", row);
//!         }
//!     },
//! );
//!
//! bus.publish(ChartEvent::RowSelected { row: 3 }).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
