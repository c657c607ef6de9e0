//! Host callbacks and drop targets.

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, TreeId};
use crate::registry::TreeConfig;

/// Where dragged items are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", rename_all = "snake_case")]
pub enum DropTarget {
    /// Onto an item, making the dragged items its children.
    Item {
        /// Tree receiving the drop.
        tree_id: TreeId,
        /// Item dropped onto.
        target_item: ItemId,
        /// Parent of the target item.
        parent_item: ItemId,
        /// Depth of the target item.
        depth: usize,
        /// Index of the target item in the linearized tree.
        linear_index: usize,
    },
    /// Between two siblings.
    Between {
        /// Tree receiving the drop.
        tree_id: TreeId,
        /// Parent receiving the dragged items.
        parent_item: ItemId,
        /// Position among the parent's children.
        child_index: usize,
        /// Depth of the insertion line.
        depth: usize,
        /// Index in the linearized tree.
        linear_index: usize,
    },
    /// Onto the tree's root.
    Root {
        /// Tree receiving the drop.
        tree_id: TreeId,
        /// The tree's root item.
        target_item: ItemId,
    },
}

impl DropTarget {
    /// The tree receiving the drop.
    pub fn tree_id(&self) -> &TreeId {
        match self {
            Self::Item { tree_id, .. } | Self::Between { tree_id, .. } | Self::Root { tree_id, .. } => {
                tree_id
            }
        }
    }
}

type TreeCallback = Box<dyn Fn(&TreeConfig) + Send + Sync>;
type UnregisterCallback = Box<dyn Fn(Option<&TreeConfig>) + Send + Sync>;
type ItemCallback = Box<dyn Fn(&ItemId, &TreeId) + Send + Sync>;
type ItemsCallback = Box<dyn Fn(&[ItemId], &TreeId) + Send + Sync>;
type DropCallback = Box<dyn Fn(&[ItemId], &DropTarget) + Send + Sync>;

/// Optional notifications from the environment to its host.
///
/// Every callback is optional; a missing one is simply not called.
/// Callbacks run with no environment lock held, so they may call back into
/// the environment.
#[derive(Default)]
pub struct EnvironmentCallbacks {
    pub(crate) on_register_tree: Option<TreeCallback>,
    pub(crate) on_unregister_tree: Option<UnregisterCallback>,
    pub(crate) on_focus_item: Option<ItemCallback>,
    pub(crate) on_expand_item: Option<ItemCallback>,
    pub(crate) on_collapse_item: Option<ItemCallback>,
    pub(crate) on_select_items: Option<ItemsCallback>,
    pub(crate) on_drop: Option<DropCallback>,
}

impl EnvironmentCallbacks {
    /// Create an empty callback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after a tree is registered.
    pub fn on_register_tree(mut self, f: impl Fn(&TreeConfig) + Send + Sync + 'static) -> Self {
        self.on_register_tree = Some(Box::new(f));
        self
    }

    /// Called before a tree is removed, with `None` if it was never registered.
    pub fn on_unregister_tree(
        mut self,
        f: impl Fn(Option<&TreeConfig>) + Send + Sync + 'static,
    ) -> Self {
        self.on_unregister_tree = Some(Box::new(f));
        self
    }

    /// Called when an item should become the tree's focused item.
    pub fn on_focus_item(mut self, f: impl Fn(&ItemId, &TreeId) + Send + Sync + 'static) -> Self {
        self.on_focus_item = Some(Box::new(f));
        self
    }

    /// Called when an item should expand.
    pub fn on_expand_item(mut self, f: impl Fn(&ItemId, &TreeId) + Send + Sync + 'static) -> Self {
        self.on_expand_item = Some(Box::new(f));
        self
    }

    /// Called when an item should collapse.
    pub fn on_collapse_item(
        mut self,
        f: impl Fn(&ItemId, &TreeId) + Send + Sync + 'static,
    ) -> Self {
        self.on_collapse_item = Some(Box::new(f));
        self
    }

    /// Called when the selection of a tree should change.
    pub fn on_select_items(
        mut self,
        f: impl Fn(&[ItemId], &TreeId) + Send + Sync + 'static,
    ) -> Self {
        self.on_select_items = Some(Box::new(f));
        self
    }

    /// Called when items are dropped.
    pub fn on_drop(mut self, f: impl Fn(&[ItemId], &DropTarget) + Send + Sync + 'static) -> Self {
        self.on_drop = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for EnvironmentCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCallbacks")
            .field("on_register_tree", &self.on_register_tree.is_some())
            .field("on_unregister_tree", &self.on_unregister_tree.is_some())
            .field("on_focus_item", &self.on_focus_item.is_some())
            .field("on_expand_item", &self.on_expand_item.is_some())
            .field("on_collapse_item", &self.on_collapse_item.is_some())
            .field("on_select_items", &self.on_select_items.is_some())
            .field("on_drop", &self.on_drop.is_some())
            .finish()
    }
}
