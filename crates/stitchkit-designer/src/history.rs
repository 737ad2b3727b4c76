//! Linear undo/redo history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use stitchkit_core::constants::DEFAULT_UNDO_LIMIT;

use crate::commands::DesignerCommand;
use crate::scene::Scene;

/// One recorded, reversible change.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command: DesignerCommand,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(command: DesignerCommand) -> Self {
        Self {
            description: command.name().to_string(),
            command,
            timestamp: Utc::now(),
        }
    }
}

/// Undo and redo stacks with a depth limit.
///
/// Recording a new entry clears the redo stack. When the undo stack is full
/// the oldest entry is dropped.
#[derive(Debug, Clone)]
pub struct UndoRedoManager {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl UndoRedoManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Records a command that has already been applied to the scene.
    pub fn record(&mut self, command: DesignerCommand) {
        tracing::debug!("Recording '{}'", command.name());
        self.redo_stack.clear();
        self.undo_stack.push_back(HistoryEntry::new(command));
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Applies a command and records it.
    pub fn push(&mut self, command: DesignerCommand, scene: &mut Scene) {
        command.apply(scene);
        self.record(command);
    }

    /// Reverts the newest entry. Returns its description.
    pub fn undo(&mut self, scene: &mut Scene) -> Option<String> {
        let entry = self.undo_stack.pop_back()?;
        tracing::debug!("Undo '{}'", entry.description);
        entry.command.undo(scene);
        let description = entry.description.clone();
        self.redo_stack.push(entry);
        Some(description)
    }

    /// Re-applies the most recently undone entry. Returns its description.
    pub fn redo(&mut self, scene: &mut Scene) -> Option<String> {
        let entry = self.redo_stack.pop()?;
        tracing::debug!("Redo '{}'", entry.description);
        entry.command.apply(scene);
        let description = entry.description.clone();
        self.undo_stack.push_back(entry);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.description.as_str())
    }

    /// Entries oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo_stack.iter()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
