//! Undo/redo for the chart state.

use super::ChartState;
use crate::history::UndoRedoManager;

impl ChartState {
    pub fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    /// Undoes the last change. Any active gesture is cancelled first.
    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(description) = self.history.undo(&mut self.scene) else {
            return false;
        };
        tracing::debug!("Undid '{}'", description);
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(description) = self.history.redo(&mut self.scene) else {
            return false;
        };
        tracing::debug!("Redid '{}'", description);
        self.after_history_step();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    /// Drops all undo and redo entries.
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.emit_history_changed();
    }

    fn after_history_step(&mut self) {
        if self
            .focused_indicator()
            .is_some_and(|id| self.scene.indicator(id).is_none())
        {
            self.set_focused_indicator(None);
        }
        if self
            .scene
            .highlighted_row()
            .is_some_and(|row| row >= self.scene.grid().row_count())
        {
            self.scene.set_highlighted_row(None);
        }
        self.emit_history_changed();
        self.emit_selection_changed();
    }
}
