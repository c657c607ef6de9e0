//! The rendering surface as seen by the focus coordinator.

use crate::ids::{ItemId, TreeId};

/// Element lookup and focus control of whatever renders the trees.
///
/// Lookups that find nothing return `None`; the coordinator treats that as
/// "not mounted yet" and does nothing.
pub trait FocusSurface: Send + Sync {
    /// Opaque reference to a rendered element.
    type Handle: Clone + std::fmt::Debug;

    /// The container element of a rendered tree.
    fn tree_container(&self, tree_id: &TreeId) -> Option<Self::Handle>;

    /// The element of an item inside a tree's container.
    fn item_element(&self, tree_id: &TreeId, item: &ItemId) -> Option<Self::Handle>;

    /// The element flagged as the tree's focus target.
    fn focus_target(&self, tree_id: &TreeId) -> Option<Self::Handle>;

    /// The element that currently owns input focus.
    fn active_element(&self) -> Option<Self::Handle>;

    /// Whether `element` is `container` or lies inside it.
    fn contains(&self, container: &Self::Handle, element: &Self::Handle) -> bool;

    /// Whether `element` is a live search input.
    fn is_search_input(&self, element: &Self::Handle) -> bool;

    /// Give input focus to an element.
    fn focus(&self, element: &Self::Handle);

    /// Scroll an element into view without touching input focus.
    fn scroll_into_view(&self, element: &Self::Handle);
}

/// A surface with nothing mounted.
///
/// For hosts that render without focusable elements; every focus operation
/// becomes a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl FocusSurface for NullSurface {
    type Handle = ();

    fn tree_container(&self, _tree_id: &TreeId) -> Option<()> {
        None
    }

    fn item_element(&self, _tree_id: &TreeId, _item: &ItemId) -> Option<()> {
        None
    }

    fn focus_target(&self, _tree_id: &TreeId) -> Option<()> {
        None
    }

    fn active_element(&self) -> Option<()> {
        None
    }

    fn contains(&self, _container: &(), _element: &()) -> bool {
        false
    }

    fn is_search_input(&self, _element: &()) -> bool {
        false
    }

    fn focus(&self, _element: &()) {}

    fn scroll_into_view(&self, _element: &()) {}
}

impl<F: FocusSurface + ?Sized> FocusSurface for std::sync::Arc<F> {
    type Handle = F::Handle;

    fn tree_container(&self, tree_id: &TreeId) -> Option<Self::Handle> {
        (**self).tree_container(tree_id)
    }

    fn item_element(&self, tree_id: &TreeId, item: &ItemId) -> Option<Self::Handle> {
        (**self).item_element(tree_id, item)
    }

    fn focus_target(&self, tree_id: &TreeId) -> Option<Self::Handle> {
        (**self).focus_target(tree_id)
    }

    fn active_element(&self) -> Option<Self::Handle> {
        (**self).active_element()
    }

    fn contains(&self, container: &Self::Handle, element: &Self::Handle) -> bool {
        (**self).contains(container, element)
    }

    fn is_search_input(&self, element: &Self::Handle) -> bool {
        (**self).is_search_input(element)
    }

    fn focus(&self, element: &Self::Handle) {
        (**self).focus(element);
    }

    fn scroll_into_view(&self, element: &Self::Handle) {
        (**self).scroll_into_view(element);
    }
}
