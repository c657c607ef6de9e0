//! Cache of linearized trees and the slot that schedules their recomputation.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::trace;

use crate::error::GroveError;
use crate::ids::TreeId;
use crate::item::ItemSource;
use crate::linear::{LinearItem, linearize};
use crate::registry::TreeRegistry;
use crate::view_state::{TreeViewState, ViewState};

/// Linearized rows of every tree, as of the last completed pass.
#[derive(Debug, Clone, Default)]
pub struct LinearItemCache {
    items: HashMap<TreeId, Arc<[LinearItem]>>,
    generation: u64,
}

impl LinearItemCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of one tree.
    pub fn get(&self, tree_id: &TreeId) -> Option<Arc<[LinearItem]>> {
        self.items.get(tree_id).cloned()
    }

    /// Rows of every tree.
    pub fn snapshot(&self) -> HashMap<TreeId, Arc<[LinearItem]>> {
        self.items.clone()
    }

    /// Check if a tree has rows.
    pub fn contains(&self, tree_id: &TreeId) -> bool {
        self.items.contains_key(tree_id)
    }

    /// Number of completed passes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace every entry with the result of a pass.
    pub fn replace(&mut self, items: HashMap<TreeId, Arc<[LinearItem]>>) -> u64 {
        self.items = items;
        self.generation += 1;
        self.generation
    }
}

/// Linearize every registered tree against the current view state.
pub fn compute<S>(
    registry: &TreeRegistry,
    view: &ViewState,
    source: &S,
) -> Result<HashMap<TreeId, Arc<[LinearItem]>>, GroveError>
where
    S: ItemSource + ?Sized,
{
    let empty = TreeViewState::default();
    let mut out = HashMap::with_capacity(registry.len());
    for config in registry.iter() {
        let tree_view = view.tree(&config.tree_id).unwrap_or(&empty);
        let rows = linearize(&config.root_item, tree_view, source, config.render_root)?;
        trace!("Linearized tree {}: {} rows", config.tree_id, rows.len());
        out.insert(config.tree_id.clone(), Arc::from(rows));
    }
    Ok(out)
}

/// Single-slot pending flag.
///
/// Requests made while a recompute is already pending fold into it, so a
/// burst of requests costs one pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PendingSlot {
    pending: Arc<AtomicBool>,
    requests: Arc<AtomicU64>,
}

impl PendingSlot {
    /// Mark a recompute as pending. Returns true if nothing was pending yet.
    pub(crate) fn request(&self) -> bool {
        self.requests.fetch_add(1, Ordering::SeqCst);
        !self.pending.swap(true, Ordering::SeqCst)
    }

    /// Clear the pending flag, returning whether it was set.
    pub(crate) fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Total number of requests ever made.
    pub(crate) fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{StaticItems, TreeItem};
    use crate::registry::TreeConfig;

    #[test]
    fn test_slot_coalesces_requests() {
        let slot = PendingSlot::default();
        assert!(slot.request());
        assert!(!slot.request());
        assert!(!slot.request());
        assert_eq!(slot.requests(), 3);
        assert!(slot.take());
        assert!(!slot.take());
        assert!(slot.request());
    }

    #[test]
    fn test_compute_covers_every_registered_tree() {
        let items = StaticItems::from_items([
            TreeItem::folder("r", ["a"]),
            TreeItem::leaf("a"),
        ]);
        let mut registry = TreeRegistry::new();
        registry.register(TreeConfig::new("t1", "r"));
        registry.register(TreeConfig::new("t2", "r").render_root(true));

        let rows = compute(&registry, &ViewState::new(), &items).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[&TreeId::from("t1")].len(), 1);
        assert_eq!(rows[&TreeId::from("t2")].len(), 2);
    }

    #[test]
    fn test_replace_bumps_generation() {
        let mut cache = LinearItemCache::new();
        assert_eq!(cache.generation(), 0);
        cache.replace(HashMap::new());
        assert_eq!(cache.replace(HashMap::new()), 2);
    }
}
