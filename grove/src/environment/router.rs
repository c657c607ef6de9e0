//! Structural change events.
//!
//! The host owns expansion state and item structure, so the environment
//! cannot tell whether a callback actually changed anything. Every
//! structural event therefore schedules a recompute after the host has seen
//! it.

use log::trace;

use crate::callbacks::DropTarget;
use crate::focus::FocusSurface;
use crate::ids::{ItemId, TreeId};
use crate::item::ItemSource;

use super::TreeEnvironment;

impl<S, F> TreeEnvironment<S, F>
where
    S: ItemSource,
    F: FocusSurface,
{
    /// Handle a request to expand an item.
    pub fn on_expand_item(&self, item: &ItemId, tree_id: &TreeId) {
        trace!("Expand {} in tree {}", item, tree_id);
        if let Some(cb) = &self.shared.callbacks.on_expand_item {
            cb(item, tree_id);
        }
        self.update_linear_items();
    }

    /// Handle a request to collapse an item.
    pub fn on_collapse_item(&self, item: &ItemId, tree_id: &TreeId) {
        trace!("Collapse {} in tree {}", item, tree_id);
        if let Some(cb) = &self.shared.callbacks.on_collapse_item {
            cb(item, tree_id);
        }
        self.update_linear_items();
    }

    /// Handle dropped items.
    pub fn on_drop(&self, items: &[ItemId], target: &DropTarget) {
        trace!("Drop of {} items into tree {}", items.len(), target.tree_id());
        if let Some(cb) = &self.shared.callbacks.on_drop {
            cb(items, target);
        }
        self.update_linear_items();
    }

    /// Handle a selection change. Selection does not affect the rows, so no
    /// recompute is scheduled.
    pub fn on_select_items(&self, items: &[ItemId], tree_id: &TreeId) {
        if let Some(cb) = &self.shared.callbacks.on_select_items {
            cb(items, tree_id);
        }
    }
}
