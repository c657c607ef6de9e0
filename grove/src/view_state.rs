//! Per-tree view state supplied by the host.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, TreeId};

/// Expansion, selection and focus of one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewState {
    /// Items whose children are visible.
    pub expanded_items: HashSet<ItemId>,
    /// Selected items, in selection order.
    pub selected_items: Vec<ItemId>,
    /// The item that holds the tree's focus marker.
    pub focused_item: Option<ItemId>,
}

impl TreeViewState {
    /// Check if an item is expanded.
    pub fn is_expanded(&self, item: &ItemId) -> bool {
        self.expanded_items.contains(item)
    }

    /// Expand an item. Returns true if it was collapsed before.
    pub fn expand(&mut self, item: impl Into<ItemId>) -> bool {
        self.expanded_items.insert(item.into())
    }

    /// Collapse an item. Returns true if it was expanded before.
    pub fn collapse(&mut self, item: &ItemId) -> bool {
        self.expanded_items.remove(item)
    }

    /// Check if an item is selected.
    pub fn is_selected(&self, item: &ItemId) -> bool {
        self.selected_items.contains(item)
    }

    /// Check if an item holds the focus marker.
    pub fn is_focused(&self, item: &ItemId) -> bool {
        self.focused_item.as_ref() == Some(item)
    }
}

/// View state of every tree, keyed by tree id.
///
/// Trees without an entry behave as if nothing is expanded, selected or
/// focused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewState {
    trees: HashMap<TreeId, TreeViewState>,
}

impl ViewState {
    /// Create an empty view state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of one tree.
    pub fn tree(&self, tree_id: &TreeId) -> Option<&TreeViewState> {
        self.trees.get(tree_id)
    }

    /// Get the state of one tree, creating an empty entry if needed.
    pub fn tree_mut(&mut self, tree_id: impl Into<TreeId>) -> &mut TreeViewState {
        self.trees.entry(tree_id.into()).or_default()
    }

    /// Replace the state of one tree.
    pub fn set_tree(&mut self, tree_id: impl Into<TreeId>, state: TreeViewState) {
        self.trees.insert(tree_id.into(), state);
    }

    /// Drop the state of one tree.
    pub fn remove_tree(&mut self, tree_id: &TreeId) -> Option<TreeViewState> {
        self.trees.remove(tree_id)
    }

    /// Check if an item is expanded in a tree.
    pub fn is_expanded(&self, tree_id: &TreeId, item: &ItemId) -> bool {
        self.tree(tree_id).is_some_and(|t| t.is_expanded(item))
    }

    /// The focused item of a tree.
    pub fn focused_item(&self, tree_id: &TreeId) -> Option<&ItemId> {
        self.tree(tree_id).and_then(|t| t.focused_item.as_ref())
    }
}
