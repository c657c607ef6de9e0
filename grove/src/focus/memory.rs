//! In-memory focus surface.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::ids::{ItemId, TreeId};

use super::surface::FocusSurface;

/// An element of a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemoryElement {
    /// A tree's container.
    Tree(TreeId),
    /// An item row inside a tree.
    Item(TreeId, ItemId),
    /// A live search input attached to a tree.
    SearchInput(TreeId),
    /// Anything outside the trees.
    Outside(String),
}

/// A focus or scroll request the surface received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `focus` was called.
    Focus(MemoryElement),
    /// `scroll_into_view` was called.
    ScrollIntoView(MemoryElement),
}

#[derive(Debug, Default)]
struct MountedTree {
    items: HashSet<ItemId>,
    focus_target: Option<ItemId>,
    search_input: bool,
}

#[derive(Debug, Default)]
struct MemoryInner {
    trees: HashMap<TreeId, MountedTree>,
    active: Option<MemoryElement>,
    calls: Vec<SurfaceCall>,
}

/// A surface that keeps its elements in memory and records every request.
///
/// Focusing an element makes it the active element, so follow-up lookups
/// see the result the way a real surface would.
#[derive(Debug, Default)]
pub struct MemorySurface {
    inner: Mutex<MemoryInner>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut MemoryInner) -> R) -> R {
        match self.inner.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Mount a tree container with the given item rows.
    pub fn mount_tree<I, T>(&self, tree_id: impl Into<TreeId>, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        let tree = MountedTree {
            items: items.into_iter().map(Into::into).collect(),
            ..Default::default()
        };
        self.with(|inner| {
            inner.trees.insert(tree_id.into(), tree);
        });
    }

    /// Remove a tree container and everything in it.
    pub fn unmount_tree(&self, tree_id: &TreeId) {
        self.with(|inner| {
            inner.trees.remove(tree_id);
            let inside = match &inner.active {
                Some(MemoryElement::Tree(t))
                | Some(MemoryElement::Item(t, _))
                | Some(MemoryElement::SearchInput(t)) => t == tree_id,
                _ => false,
            };
            if inside {
                inner.active = None;
            }
        });
    }

    /// Flag an item row as its tree's focus target.
    pub fn set_focus_target(&self, tree_id: &TreeId, item: Option<ItemId>) {
        self.with(|inner| {
            if let Some(tree) = inner.trees.get_mut(tree_id) {
                tree.focus_target = item;
            }
        });
    }

    /// Attach a live search input to a mounted tree.
    pub fn mount_search_input(&self, tree_id: &TreeId) {
        self.with(|inner| {
            if let Some(tree) = inner.trees.get_mut(tree_id) {
                tree.search_input = true;
            }
        });
    }

    /// Set the active element directly, as user input would.
    pub fn set_active(&self, element: Option<MemoryElement>) {
        self.with(|inner| inner.active = element);
    }

    /// The active element.
    pub fn active(&self) -> Option<MemoryElement> {
        self.with(|inner| inner.active.clone())
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.with(|inner| inner.calls.clone())
    }

    /// Requests received so far, clearing the record.
    pub fn take_calls(&self) -> Vec<SurfaceCall> {
        self.with(|inner| std::mem::take(&mut inner.calls))
    }
}

impl FocusSurface for MemorySurface {
    type Handle = MemoryElement;

    fn tree_container(&self, tree_id: &TreeId) -> Option<MemoryElement> {
        self.with(|inner| {
            inner
                .trees
                .contains_key(tree_id)
                .then(|| MemoryElement::Tree(tree_id.clone()))
        })
    }

    fn item_element(&self, tree_id: &TreeId, item: &ItemId) -> Option<MemoryElement> {
        self.with(|inner| {
            inner
                .trees
                .get(tree_id)
                .filter(|tree| tree.items.contains(item))
                .map(|_| MemoryElement::Item(tree_id.clone(), item.clone()))
        })
    }

    fn focus_target(&self, tree_id: &TreeId) -> Option<MemoryElement> {
        self.with(|inner| {
            let tree = inner.trees.get(tree_id)?;
            let item = tree.focus_target.as_ref()?;
            tree.items
                .contains(item)
                .then(|| MemoryElement::Item(tree_id.clone(), item.clone()))
        })
    }

    fn active_element(&self) -> Option<MemoryElement> {
        self.active()
    }

    fn contains(&self, container: &MemoryElement, element: &MemoryElement) -> bool {
        if container == element {
            return true;
        }
        match (container, element) {
            (MemoryElement::Tree(c), MemoryElement::Item(t, _))
            | (MemoryElement::Tree(c), MemoryElement::SearchInput(t)) => c == t,
            _ => false,
        }
    }

    fn is_search_input(&self, element: &MemoryElement) -> bool {
        let MemoryElement::SearchInput(tree_id) = element else {
            return false;
        };
        self.with(|inner| inner.trees.get(tree_id).is_some_and(|t| t.search_input))
    }

    fn focus(&self, element: &MemoryElement) {
        self.with(|inner| {
            inner.active = Some(element.clone());
            inner.calls.push(SurfaceCall::Focus(element.clone()));
        });
    }

    fn scroll_into_view(&self, element: &MemoryElement) {
        self.with(|inner| {
            inner.calls.push(SurfaceCall::ScrollIntoView(element.clone()));
        });
    }
}
