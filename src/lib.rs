//! # StitchKit
//!
//! A crochet stitch chart editor. Charts are grids of stitch cells laid out
//! in straight rows or concentric rounds, edited through a small set of
//! pointer-driven modes with full undo/redo.
//!
//! ## Architecture
//!
//! StitchKit is organized as a workspace with multiple crates:
//!
//! 1. **stitchkit-core** - Colors, errors, chart events, defaults provider
//! 2. **stitchkit-settings** - Config file handling and persistence
//! 3. **stitchkit-designer** - Scene, grid, edit modes, history, rendering
//! 4. **stitchkit** - Main binary that integrates all crates

pub use stitchkit_designer as designer;
pub use stitchkit_settings as settings;

pub use stitchkit_core::{
    ChartEvent, Color, ColorRole, DefaultsProvider, Error, EventBus, EventFilter, ItemId, Result,
    StaticDefaults,
};

pub use stitchkit_designer::{
    ChartDocument, ChartState, ChartStyle, EditMode, MirrorDirection, PointerEvent, Scene,
    StitchLibrary,
};

pub use stitchkit_settings::{Config, SettingsPersistence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
