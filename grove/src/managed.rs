//! Environments that manage their own view state.
//!
//! A host that does not want to own expansion, selection and focus can let
//! these callbacks apply every request directly to a [`SharedState`] view
//! state, and every drop to a [`StaticItems`] source.

use log::debug;

use crate::callbacks::EnvironmentCallbacks;
use crate::environment::{EnvironmentBuilder, TreeEnvironment};
use crate::focus::FocusSurface;
use crate::item::StaticItems;
use crate::state::SharedState;
use crate::view_state::ViewState;

impl EnvironmentCallbacks {
    /// Callbacks that apply each request to the given state.
    ///
    /// - expand / collapse add or remove the item from `expanded_items`
    /// - select replaces `selected_items`
    /// - focus sets `focused_item`
    /// - drop moves the items inside `items`
    pub fn managed(view_state: SharedState<ViewState>, items: SharedState<StaticItems>) -> Self {
        let expand_view = view_state.clone();
        let collapse_view = view_state.clone();
        let select_view = view_state.clone();
        let focus_view = view_state;

        Self::new()
            .on_expand_item(move |item, tree_id| {
                expand_view.update(|v| v.tree_mut(tree_id).expand(item));
            })
            .on_collapse_item(move |item, tree_id| {
                collapse_view.update(|v| v.tree_mut(tree_id).collapse(item));
            })
            .on_select_items(move |selected, tree_id| {
                select_view.update(|v| v.tree_mut(tree_id).selected_items = selected.to_vec());
            })
            .on_focus_item(move |item, tree_id| {
                focus_view.update(|v| v.tree_mut(tree_id).focused_item = Some(item.clone()));
            })
            .on_drop(move |dropped, target| {
                let moved = items.update(|source| source.move_items(dropped, target));
                debug!(
                    "Moved {} of {} dropped items",
                    moved.map_or(0, |m| m.len()),
                    dropped.len()
                );
            })
    }
}

impl<F: FocusSurface> TreeEnvironment<StaticItems, F> {
    /// Start building an environment that owns its view state.
    ///
    /// The builder comes with [`EnvironmentCallbacks::managed`] installed;
    /// replacing the callbacks turns the management off.
    pub fn managed(
        items: StaticItems,
        view_state: ViewState,
        surface: F,
    ) -> EnvironmentBuilder<StaticItems, F> {
        let items = SharedState::new(items);
        let view_state = SharedState::new(view_state);
        let callbacks = EnvironmentCallbacks::managed(view_state.clone(), items.clone());
        Self::builder(items, view_state, surface).callbacks(callbacks)
    }
}
