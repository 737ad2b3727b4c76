use stitchkit_core::ItemId;

use crate::item_store::ItemStore;
use crate::model::{Bounds, SceneShape};

/// Tracks which items are selected.
///
/// Selection lives on root items only: picking a child of a group selects
/// the outermost group. The `selected` flags on the items are the source of
/// truth; the manager also remembers the primary (most recently picked) item.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    primary: Option<ItemId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self { primary: None }
    }

    /// Most recently selected root item.
    pub fn primary(&self) -> Option<ItemId> {
        self.primary
    }

    pub fn deselect_all(&mut self, store: &mut ItemStore) {
        for item in store.iter_mut() {
            item.set_selected(false);
        }
        self.primary = None;
    }

    /// Selects every root item; the topmost becomes primary.
    pub fn select_all(&mut self, store: &mut ItemStore) {
        for item in store.iter_mut() {
            let is_root = item.parent().is_none();
            item.set_selected(is_root);
        }
        self.primary = store
            .iter()
            .rev()
            .find(|i| i.parent().is_none())
            .map(|i| i.id());
    }

    /// Selects the root that owns `id`.
    ///
    /// Without `multi` the previous selection is replaced; with it the root's
    /// selection is toggled.
    pub fn select(&mut self, store: &mut ItemStore, id: ItemId, multi: bool) -> Option<ItemId> {
        let root = root_of(store, id)?;
        if multi {
            let now = store.get(root).is_some_and(|i| !i.is_selected());
            if let Some(item) = store.get_mut(root) {
                item.set_selected(now);
            }
            self.primary = if now { Some(root) } else { None };
        } else {
            self.deselect_all(store);
            if let Some(item) = store.get_mut(root) {
                item.set_selected(true);
            }
            self.primary = Some(root);
        }
        Some(root)
    }

    /// Replaces the selection with the roots owning `ids`. Returns the
    /// number of distinct roots selected.
    pub fn select_many(&mut self, store: &mut ItemStore, ids: &[ItemId]) -> usize {
        self.deselect_all(store);
        let mut count = 0;
        for id in ids {
            let Some(root) = root_of(store, *id) else {
                continue;
            };
            if let Some(item) = store.get_mut(root) {
                if !item.is_selected() {
                    item.set_selected(true);
                    count += 1;
                }
            }
            self.primary = Some(root);
        }
        count
    }

    /// Selects every root whose bounds intersect `rect`, replacing the
    /// current selection unless `multi`. Returns the number selected.
    pub fn select_in_rect(&mut self, store: &mut ItemStore, rect: Bounds, multi: bool) -> usize {
        if !multi {
            self.deselect_all(store);
        }
        let hits: Vec<ItemId> = store
            .iter()
            .filter(|i| i.parent().is_none() && i.bounds().intersects(&rect))
            .map(|i| i.id())
            .collect();
        for id in &hits {
            if let Some(item) = store.get_mut(*id) {
                item.set_selected(true);
            }
        }
        if let Some(last) = hits.last() {
            self.primary = Some(*last);
        }
        hits.len()
    }

    /// Selected root items in paint order.
    pub fn selected_roots(&self, store: &ItemStore) -> Vec<ItemId> {
        store
            .iter()
            .filter(|i| i.parent().is_none() && i.is_selected())
            .map(|i| i.id())
            .collect()
    }

    pub fn selected_count(&self, store: &ItemStore) -> usize {
        self.selected_roots(store).len()
    }

    /// Forgets the primary item if it no longer exists.
    pub fn prune(&mut self, store: &ItemStore) {
        if self.primary.is_some_and(|id| !store.contains(id)) {
            self.primary = None;
        }
    }
}

/// Outermost group containing `id`, or `id` itself when it is a root.
pub fn root_of(store: &ItemStore, id: ItemId) -> Option<ItemId> {
    let mut current = store.get(id)?;
    while let Some(parent) = current.parent() {
        match store.get(parent) {
            Some(p) => current = p,
            None => break,
        }
    }
    Some(current.id())
}
