//! Registry of trees managed by one environment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, TreeId};

/// Configuration of one registered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Unique id of the tree within its environment.
    pub tree_id: TreeId,
    /// The item the tree is rooted at.
    pub root_item: ItemId,
    /// Human readable label.
    #[serde(default)]
    pub tree_label: Option<String>,
    /// Whether the root item itself is shown as a depth-0 row.
    #[serde(default)]
    pub render_root: bool,
}

impl TreeConfig {
    /// Create a config for a tree rooted at `root_item`.
    pub fn new(tree_id: impl Into<TreeId>, root_item: impl Into<ItemId>) -> Self {
        Self {
            tree_id: tree_id.into(),
            root_item: root_item.into(),
            tree_label: None,
            render_root: false,
        }
    }

    /// Set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.tree_label = Some(label.into());
        self
    }

    /// Show the root item as its own row.
    pub fn render_root(mut self, render_root: bool) -> Self {
        self.render_root = render_root;
        self
    }
}

/// Ordered mapping from tree id to configuration.
///
/// Iteration follows registration order. Re-registering an id replaces its
/// config in place.
#[derive(Debug, Clone, Default)]
pub struct TreeRegistry {
    trees: IndexMap<TreeId, TreeConfig>,
}

impl TreeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a config. Returns the config it replaced.
    pub fn register(&mut self, config: TreeConfig) -> Option<TreeConfig> {
        self.trees.insert(config.tree_id.clone(), config)
    }

    /// Remove a config, keeping the order of the remaining trees.
    pub fn unregister(&mut self, tree_id: &TreeId) -> Option<TreeConfig> {
        self.trees.shift_remove(tree_id)
    }

    /// Get a config by id.
    pub fn get(&self, tree_id: &TreeId) -> Option<&TreeConfig> {
        self.trees.get(tree_id)
    }

    /// Check if a tree is registered.
    pub fn contains(&self, tree_id: &TreeId) -> bool {
        self.trees.contains_key(tree_id)
    }

    /// Registered ids in registration order.
    pub fn tree_ids(&self) -> Vec<TreeId> {
        self.trees.keys().cloned().collect()
    }

    /// Iterate over configs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeConfig> {
        self.trees.values()
    }

    /// Number of registered trees.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Check if no tree is registered.
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reregistration_keeps_position() {
        let mut registry = TreeRegistry::new();
        registry.register(TreeConfig::new("left", "root"));
        registry.register(TreeConfig::new("right", "root"));
        let old = registry.register(TreeConfig::new("left", "other").label("Left"));

        assert_eq!(old.map(|c| c.root_item), Some(ItemId::from("root")));
        assert_eq!(registry.tree_ids(), vec![TreeId::from("left"), TreeId::from("right")]);
        assert_eq!(
            registry.get(&"left".into()).map(|c| c.root_item.clone()),
            Some(ItemId::from("other"))
        );
    }

    #[test]
    fn test_unregister_unknown_is_none() {
        let mut registry = TreeRegistry::new();
        assert!(registry.unregister(&"missing".into()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_preserves_order() {
        let mut registry = TreeRegistry::new();
        for id in ["a", "b", "c"] {
            registry.register(TreeConfig::new(id, "root"));
        }
        registry.unregister(&"a".into());
        assert_eq!(registry.tree_ids(), vec![TreeId::from("b"), TreeId::from("c")]);
    }
}
