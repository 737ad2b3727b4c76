//! Chart editing state for UI integration.
//!
//! `ChartState` owns the scene and its history and interprets pointer input
//! according to the active edit mode. Hosts drive it with `&mut self` calls
//! and listen for [`ChartEvent`]s on the shared event bus.
//!
//! This module is split into submodules:
//! - `gestures`: press/move/release handling per edit mode
//! - `structure`: chart creation and row operations
//! - `transforms`: selection, align, distribute, mirror, rotate, grouping
//! - `history`: undo/redo
//! - `clipboard`: copy, cut, paste, delete

mod clipboard;
mod gestures;
mod history;
mod structure;
mod transforms;

pub use clipboard::ClipboardItems;
pub use gestures::{Gesture, GestureKind};

use std::sync::Arc;

use image::RgbImage;
use stitchkit_core::{ChartEvent, Color, DefaultsProvider, EventBus, ItemId};

use crate::commands::DesignerCommand;
use crate::edit_mode::EditMode;
use crate::grid::{ChartStyle, GridLayout};
use crate::history::UndoRedoManager;
use crate::model::Size;
use crate::renderer::{self, PaintContext, Painter};
use crate::scene::Scene;
use crate::stitch_library::StitchResolver;

/// Editing state of one open chart.
pub struct ChartState {
    pub(crate) scene: Scene,
    pub(crate) history: UndoRedoManager,
    pub(crate) clipboard: Option<String>,
    pub(crate) paste_count: usize,
    pub(crate) gesture: Option<Gesture>,
    edit_stitch: String,
    edit_color: Color,
    edit_background: Color,
    mode: EditMode,
    focused_indicator: Option<ItemId>,
    indicators_highlighted: bool,
    events: Arc<EventBus>,
    defaults: Arc<dyn DefaultsProvider>,
    library: Arc<dyn StitchResolver>,
}

impl std::fmt::Debug for ChartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartState")
            .field("mode", &self.mode)
            .field("items", &self.scene.item_count())
            .field("rows", &self.scene.grid().row_count())
            .field("undo_depth", &self.history.undo_depth())
            .field("gesture", &self.gesture)
            .finish()
    }
}

impl ChartState {
    /// Creates an empty blank chart seeded from `defaults`.
    pub fn new(defaults: Arc<dyn DefaultsProvider>, library: Arc<dyn StitchResolver>) -> Self {
        let layout = Self::layout_from(defaults.as_ref(), ChartStyle::Blank);
        Self {
            scene: Scene::new(layout),
            history: UndoRedoManager::new(defaults.undo_limit()),
            clipboard: None,
            paste_count: 0,
            gesture: None,
            edit_stitch: defaults.default_stitch(),
            edit_color: defaults.primary_color(),
            edit_background: defaults.background_color(),
            mode: EditMode::default(),
            focused_indicator: None,
            indicators_highlighted: false,
            events: Arc::new(EventBus::new()),
            defaults,
            library,
        }
    }

    /// Uses a shared event bus instead of a private one.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub(crate) fn layout_from(defaults: &dyn DefaultsProvider, style: ChartStyle) -> GridLayout {
        let (w, h) = defaults.cell_size();
        GridLayout::new(style, Size::new(w, h), defaults.row_spacing())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn defaults(&self) -> &dyn DefaultsProvider {
        self.defaults.as_ref()
    }

    pub fn library(&self) -> &dyn StitchResolver {
        self.library.as_ref()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switches the edit mode, abandoning any gesture in progress.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.cancel_gesture();
        if self.mode == mode {
            return;
        }
        tracing::debug!("Edit mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.emit(ChartEvent::ModeChanged {
            mode: mode.to_string(),
        });
    }

    pub fn edit_stitch(&self) -> &str {
        &self.edit_stitch
    }

    pub fn set_edit_stitch(&mut self, stitch: impl Into<String>) {
        self.edit_stitch = stitch.into();
    }

    pub fn edit_color(&self) -> Color {
        self.edit_color
    }

    pub fn set_edit_color(&mut self, color: Color) {
        self.edit_color = color;
    }

    pub fn edit_background(&self) -> Color {
        self.edit_background
    }

    pub fn set_edit_background(&mut self, color: Color) {
        self.edit_background = color;
    }

    pub fn focused_indicator(&self) -> Option<ItemId> {
        self.focused_indicator
    }

    pub fn indicators_highlighted(&self) -> bool {
        self.indicators_highlighted
    }

    /// Highlights every indicator on the chart.
    pub fn highlight_indicators(&mut self, highlight: bool) {
        self.indicators_highlighted = highlight;
    }

    /// Shows or hides the centre marker of rounds charts.
    pub fn set_show_chart_center(&mut self, show: bool) {
        self.scene.set_show_chart_center(show);
    }

    /// Glyph size of a stitch as reported by the library.
    pub fn stitch_size(&self, stitch: &str) -> Size {
        self.library.resolve(stitch, self.edit_color).size()
    }

    /// Paints the chart through any painter.
    pub fn paint(&self, painter: &mut dyn Painter) {
        let mut ctx = PaintContext::new(self.library.as_ref());
        ctx.indicators_highlighted = self.indicators_highlighted;
        renderer::paint_scene(&self.scene, painter, &ctx);
    }

    /// Rasterizes the chart to an image fitted to its contents.
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        renderer::render_scene(&self.scene, self.library.as_ref(), width, height)
    }

    /// Replaces the scene, e.g. after loading a document. History is cleared.
    pub fn load_scene(&mut self, scene: Scene) {
        self.gesture = None;
        self.set_focused_indicator(None);
        self.scene = scene;
        self.reset_history();
        tracing::info!(
            "Loaded chart with {} items in {} rows",
            self.scene.item_count(),
            self.scene.grid().row_count()
        );
    }

    /// Moves text focus to another indicator (or none), sending focus events.
    pub fn set_focused_indicator(&mut self, id: Option<ItemId>) {
        if self.focused_indicator == id {
            return;
        }
        if let Some(old) = self.focused_indicator.take() {
            if let Some(indicator) = self
                .scene
                .item_mut(old)
                .and_then(|i| i.as_indicator_mut())
            {
                indicator.focused = false;
            }
            self.emit(ChartEvent::IndicatorFocusLost { indicator: old });
        }
        let Some(new) = id else {
            return;
        };
        match self.scene.item_mut(new).and_then(|i| i.as_indicator_mut()) {
            Some(indicator) => {
                indicator.focused = true;
                self.focused_indicator = Some(new);
                self.emit(ChartEvent::IndicatorFocusGained { indicator: new });
            }
            None => tracing::warn!("set_focused_indicator: {} is not an indicator", new),
        }
    }

    pub(crate) fn emit(&self, event: ChartEvent) {
        tracing::trace!("{}", event.description());
        if let Err(e) = self.events.publish(event) {
            tracing::trace!("Event not delivered: {}", e);
        }
    }

    pub(crate) fn emit_selection_changed(&self) {
        self.emit(ChartEvent::SelectionChanged {
            count: self.scene.selected_ids().len(),
        });
    }

    pub(crate) fn emit_history_changed(&self) {
        self.emit(ChartEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Records a command whose effect is already on the scene.
    pub(crate) fn record_command(&mut self, command: DesignerCommand) {
        self.history.record(command);
        self.emit_history_changed();
    }
}
