//! Item sources.
//!
//! The environment never owns tree items. It asks an [`ItemSource`] for the
//! children and branch status of items while linearizing, and only for the
//! items that are actually visible.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::callbacks::DropTarget;
use crate::error::GroveError;
use crate::ids::ItemId;
use crate::state::SharedState;

/// Host-provided access to tree structure.
pub trait ItemSource: Send + Sync {
    /// Children of an item, in display order.
    ///
    /// Returns `Ok(None)` when the item is not known to the source. The
    /// linearizer treats such an item as a leaf.
    fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError>;

    /// Whether an item can hold children. Unknown items are not branches.
    fn is_branch(&self, item: &ItemId) -> Result<bool, GroveError>;
}

impl<S: ItemSource + ?Sized> ItemSource for &S {
    fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError> {
        (**self).children(item)
    }

    fn is_branch(&self, item: &ItemId) -> Result<bool, GroveError> {
        (**self).is_branch(item)
    }
}

impl<S: ItemSource> ItemSource for SharedState<S> {
    fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError> {
        self.read(|source| source.children(item))
    }

    fn is_branch(&self, item: &ItemId) -> Result<bool, GroveError> {
        self.read(|source| source.is_branch(item))
    }
}

/// A single item of a [`StaticItems`] source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem {
    /// The item's id.
    pub index: ItemId,
    /// Child ids, in display order.
    #[serde(default)]
    pub children: Vec<ItemId>,
    /// Whether the item can be expanded.
    #[serde(default)]
    pub is_folder: bool,
    /// Display payload.
    #[serde(default)]
    pub data: Option<String>,
}

impl TreeItem {
    /// Create a leaf item.
    pub fn leaf(index: impl Into<ItemId>) -> Self {
        Self {
            index: index.into(),
            children: Vec::new(),
            is_folder: false,
            data: None,
        }
    }

    /// Create a folder item with the given children.
    pub fn folder<I, C>(index: impl Into<ItemId>, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ItemId>,
    {
        Self {
            index: index.into(),
            children: children.into_iter().map(Into::into).collect(),
            is_folder: true,
            data: None,
        }
    }

    /// Attach a display payload.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// In-memory item source backed by a map.
///
/// Deserializes from a JSON object keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticItems {
    items: HashMap<ItemId, TreeItem>,
}

impl StaticItems {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from a list of items.
    pub fn from_items(items: impl IntoIterator<Item = TreeItem>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.index.clone(), item))
                .collect(),
        }
    }

    /// Get an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&TreeItem> {
        self.items.get(id)
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: TreeItem) -> Option<TreeItem> {
        self.items.insert(item.index.clone(), item)
    }

    /// Remove an item. Parents keep referencing it until they are updated.
    pub fn remove(&mut self, id: &ItemId) -> Option<TreeItem> {
        self.items.remove(id)
    }

    /// Replace the children of an item. Returns false if the item is unknown.
    pub fn set_children(&mut self, id: &ItemId, children: Vec<ItemId>) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.children = children;
                true
            }
            None => false,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the item that lists `id` among its children.
    pub fn parent_of(&self, id: &ItemId) -> Option<&ItemId> {
        self.items
            .values()
            .find(|item| item.children.contains(id))
            .map(|item| &item.index)
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: &ItemId, id: &ItemId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            // Malformed sources can contain parent cycles.
            steps += 1;
            if steps > self.items.len() {
                return false;
            }
            current = self.parent_of(cur);
        }
        false
    }

    /// Move items to a drop target.
    ///
    /// Items without a parent, drops onto an item's own subtree, and drops
    /// into unknown parents are skipped. Returns the ids that actually moved.
    pub fn move_items(&mut self, items: &[ItemId], target: &DropTarget) -> Vec<ItemId> {
        let mut moved = Vec::new();
        let mut offset = 0;

        for item in items {
            let Some(old_parent) = self.parent_of(item).cloned() else {
                debug!("Drop skipped: `{}` has no parent", item);
                continue;
            };

            let (new_parent, child_index) = match target {
                DropTarget::Item { target_item, .. } | DropTarget::Root { target_item, .. } => {
                    (target_item, None)
                }
                DropTarget::Between {
                    parent_item,
                    child_index,
                    ..
                } => (parent_item, Some(*child_index)),
            };

            if !self.items.contains_key(new_parent) || self.is_ancestor_or_self(item, new_parent) {
                debug!("Drop skipped: `{}` cannot move into `{}`", item, new_parent);
                continue;
            }

            match child_index {
                None => {
                    if &old_parent == new_parent {
                        continue;
                    }
                    self.detach(&old_parent, item);
                    if let Some(parent) = self.items.get_mut(new_parent) {
                        parent.children.push(item.clone());
                    }
                }
                Some(child_index) => {
                    let old_index = self
                        .items
                        .get(&old_parent)
                        .and_then(|p| p.children.iter().position(|c| c == item));
                    self.detach(&old_parent, item);

                    let mut index = child_index + offset;
                    if &old_parent == new_parent && old_index.is_some_and(|i| i < child_index) {
                        index -= 1;
                    }
                    if let Some(parent) = self.items.get_mut(new_parent) {
                        let index = index.min(parent.children.len());
                        parent.children.insert(index, item.clone());
                    }
                    offset += 1;
                }
            }
            moved.push(item.clone());
        }

        moved
    }

    fn detach(&mut self, parent: &ItemId, item: &ItemId) {
        if let Some(parent) = self.items.get_mut(parent) {
            parent.children.retain(|c| c != item);
        }
    }
}

impl ItemSource for StaticItems {
    fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError> {
        Ok(self.items.get(item).map(|i| i.children.clone()))
    }

    fn is_branch(&self, item: &ItemId) -> Result<bool, GroveError> {
        Ok(self.items.get(item).is_some_and(|i| i.is_folder))
    }
}
