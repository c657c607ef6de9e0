//! Focus decisions, independent of where the state lives.

use log::{debug, trace};

use crate::ids::{ItemId, TreeId};

use super::surface::FocusSurface;

/// The tree that currently holds logical focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveTree {
    current: Option<TreeId>,
}

impl ActiveTree {
    /// The active tree, if any.
    pub fn get(&self) -> Option<&TreeId> {
        self.current.as_ref()
    }

    /// Store `next` if the active tree still is `expected`.
    ///
    /// Returns false, leaving the value alone, if it changed in between.
    pub fn compare_and_set(&mut self, expected: Option<&TreeId>, next: Option<TreeId>) -> bool {
        if self.current.as_ref() != expected {
            return false;
        }
        self.current = next;
        true
    }
}

/// How an item focus request was applied to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    /// The item element received input focus.
    Focused,
    /// A search input kept focus; the item was scrolled into view.
    Scrolled,
    /// The surface was left alone.
    Skipped,
}

/// Focus the element flagged as the tree's focus target.
///
/// Returns false if no such element is mounted.
pub fn focus_tree<F: FocusSurface + ?Sized>(surface: &F, tree_id: &TreeId) -> bool {
    match surface.focus_target(tree_id) {
        Some(target) => {
            debug!("Focusing tree {}", tree_id);
            surface.focus(&target);
            true
        }
        None => {
            trace!("Tree {} has no mounted focus target", tree_id);
            false
        }
    }
}

/// Whether focus already lies inside the tree's container.
///
/// An unmounted container contains nothing.
pub fn tree_has_focus<F: FocusSurface + ?Sized>(surface: &F, tree_id: &TreeId) -> bool {
    match (surface.tree_container(tree_id), surface.active_element()) {
        (Some(container), Some(active)) => surface.contains(&container, &active),
        _ => false,
    }
}

/// Move the surface to an item that became the tree's focused item.
///
/// With `auto_focus` off the surface is not touched. When a live search
/// input owns focus the item is only scrolled into view, so typing in the
/// search field is not interrupted.
pub fn focus_item<F: FocusSurface + ?Sized>(
    surface: &F,
    tree_id: &TreeId,
    item: &ItemId,
    auto_focus: bool,
) -> FocusMove {
    if !auto_focus {
        return FocusMove::Skipped;
    }
    let Some(element) = surface.item_element(tree_id, item) else {
        trace!("Item {} of tree {} is not mounted", item, tree_id);
        return FocusMove::Skipped;
    };

    let searching = surface
        .active_element()
        .is_some_and(|active| surface.is_search_input(&active));
    if searching {
        surface.scroll_into_view(&element);
        FocusMove::Scrolled
    } else {
        surface.focus(&element);
        FocusMove::Focused
    }
}
