use std::collections::HashMap;

use stitchkit_core::ItemId;

use crate::model::SceneItem;

/// Owns every scene item and keeps their paint (z) order.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: HashMap<ItemId, SceneItem>,
    draw_order: Vec<ItemId>,
    next_id: ItemId,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            draw_order: Vec::new(),
            next_id: 1,
        }
    }

    pub fn generate_id(&mut self) -> ItemId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Ensures future ids are greater than `id`.
    pub fn reserve_id(&mut self, id: ItemId) {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// Adds an item on top of the paint order. An item with the same id is replaced in place.
    pub fn insert(&mut self, item: SceneItem) {
        let id = item.id();
        self.reserve_id(id);
        if self.items.insert(id, item).is_none() {
            self.draw_order.push(id);
        }
    }

    /// Adds an item at a paint-order position (clamped to the end).
    pub fn insert_at(&mut self, index: usize, item: SceneItem) {
        let id = item.id();
        self.reserve_id(id);
        if self.items.insert(id, item).is_none() {
            let index = index.min(self.draw_order.len());
            self.draw_order.insert(index, id);
        }
    }

    pub fn remove(&mut self, id: ItemId) -> Option<SceneItem> {
        self.remove_with_index(id).map(|(_, item)| item)
    }

    /// Removes an item, also returning where it was in the paint order.
    pub fn remove_with_index(&mut self, id: ItemId) -> Option<(usize, SceneItem)> {
        let item = self.items.remove(&id)?;
        let index = self.draw_order.iter().position(|d| *d == id).unwrap_or(0);
        self.draw_order.retain(|d| *d != id);
        Some((index, item))
    }

    pub fn get(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn draw_index(&self, id: ItemId) -> Option<usize> {
        self.draw_order.iter().position(|d| *d == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SceneItem> + '_ {
        self.draw_order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneItem> {
        self.items.values_mut()
    }

    pub fn draw_order(&self) -> &[ItemId] {
        &self.draw_order
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.draw_order.clear();
    }
}
