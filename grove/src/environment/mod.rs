//! The tree environment.
//!
//! One [`TreeEnvironment`] owns everything shared by the trees rendered
//! inside it: the registry of tree configurations, the cache of linearized
//! rows, and the active tree. It is a cheap, clonable handle; every clone
//! talks to the same state.
//!
//! # Example
//!
//! ```
//! use grove::prelude::*;
//!
//! let items = SharedState::new(StaticItems::from_items([
//!     TreeItem::folder("r", ["a", "b"]),
//!     TreeItem::folder("a", ["a1"]),
//!     TreeItem::leaf("a1"),
//!     TreeItem::leaf("b"),
//! ]));
//! let view = SharedState::new(ViewState::default());
//! let env = TreeEnvironment::builder(items, view.clone(), NullSurface).build();
//!
//! env.register_tree(TreeConfig::new("t1", "r").render_root(true));
//! env.flush().unwrap();
//! let rows = env.linear_items(&"t1".into()).unwrap();
//! assert_eq!(rows.len(), 3);
//!
//! view.update(|v| v.tree_mut("t1").expand("a"));
//! env.on_expand_item(&"a".into(), &"t1".into());
//! env.flush().unwrap();
//! assert_eq!(env.linear_items(&"t1".into()).unwrap().len(), 4);
//! ```

mod driver;
mod router;

pub use driver::{DriverHandle, RecomputeDriver};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use log::{debug, trace, warn};
use tokio::sync::watch;

use crate::cache::{self, LinearItemCache, PendingSlot};
use crate::callbacks::EnvironmentCallbacks;
use crate::config::EnvironmentConfig;
use crate::error::GroveError;
use crate::focus::{self, ActiveTree, FocusMove, FocusSurface};
use crate::ids::{ItemId, TreeId};
use crate::item::ItemSource;
use crate::linear::LinearItem;
use crate::registry::{TreeConfig, TreeRegistry};
use crate::state::SharedState;
use crate::view_state::ViewState;
use crate::wakeup::WakeupHandle;

/// State mutated through the environment's own operations.
#[derive(Debug, Default)]
struct EnvironmentInner {
    registry: TreeRegistry,
    cache: LinearItemCache,
    active: ActiveTree,
}

/// Everything fixed at construction.
struct Shared<S, F> {
    config: EnvironmentConfig,
    items: SharedState<S>,
    view_state: SharedState<ViewState>,
    surface: F,
    callbacks: EnvironmentCallbacks,
    pending: PendingSlot,
    wakeup: WakeupHandle,
    generation: watch::Sender<u64>,
}

/// Builder for [`TreeEnvironment`].
pub struct EnvironmentBuilder<S, F> {
    config: EnvironmentConfig,
    items: SharedState<S>,
    view_state: SharedState<ViewState>,
    surface: F,
    callbacks: EnvironmentCallbacks,
}

impl<S, F> EnvironmentBuilder<S, F>
where
    S: ItemSource,
    F: FocusSurface,
{
    /// Set the environment options.
    pub fn config(mut self, config: EnvironmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host callbacks.
    pub fn callbacks(mut self, callbacks: EnvironmentCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Build the environment.
    pub fn build(self) -> TreeEnvironment<S, F> {
        let (generation, _) = watch::channel(0);
        TreeEnvironment {
            inner: Arc::new(RwLock::new(EnvironmentInner::default())),
            shared: Arc::new(Shared {
                config: self.config,
                items: self.items,
                view_state: self.view_state,
                surface: self.surface,
                callbacks: self.callbacks,
                pending: PendingSlot::default(),
                wakeup: WakeupHandle::new(),
                generation,
            }),
        }
    }
}

/// Shared state of a set of trees: registry, linearized rows and focus.
pub struct TreeEnvironment<S, F> {
    inner: Arc<RwLock<EnvironmentInner>>,
    shared: Arc<Shared<S, F>>,
}

impl<S, F> Clone for TreeEnvironment<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, F> std::fmt::Debug for TreeEnvironment<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().ok();
        f.debug_struct("TreeEnvironment")
            .field("config", &self.shared.config)
            .field("tree_ids", &inner.as_ref().map(|g| g.registry.tree_ids()))
            .field("active_tree", &inner.as_ref().map(|g| g.active.get().cloned()))
            .field("pending", &self.shared.pending.is_pending())
            .field("driver", &self.shared.wakeup.is_installed())
            .finish_non_exhaustive()
    }
}

impl<S, F> TreeEnvironment<S, F>
where
    S: ItemSource,
    F: FocusSurface,
{
    /// Start building an environment over an item source, a view state and
    /// a rendering surface.
    pub fn builder(
        items: SharedState<S>,
        view_state: SharedState<ViewState>,
        surface: F,
    ) -> EnvironmentBuilder<S, F> {
        EnvironmentBuilder {
            config: EnvironmentConfig::default(),
            items,
            view_state,
            surface,
            callbacks: EnvironmentCallbacks::default(),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&EnvironmentInner) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn write<R>(&self, f: impl FnOnce(&mut EnvironmentInner) -> R) -> R {
        match self.inner.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The environment options.
    pub fn config(&self) -> &EnvironmentConfig {
        &self.shared.config
    }

    /// The item source.
    pub fn items(&self) -> &SharedState<S> {
        &self.shared.items
    }

    /// The view state.
    pub fn view_state(&self) -> &SharedState<ViewState> {
        &self.shared.view_state
    }

    /// The rendering surface.
    pub fn surface(&self) -> &F {
        &self.shared.surface
    }

    // -------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------

    /// Register a tree, replacing any tree with the same id.
    ///
    /// Notifies the host and schedules a recompute of every tree.
    pub fn register_tree(&self, config: TreeConfig) {
        debug!("Registering tree {} (root {})", config.tree_id, config.root_item);
        self.write(|inner| inner.registry.register(config.clone()));
        if let Some(cb) = &self.shared.callbacks.on_register_tree {
            cb(&config);
        }
        self.update_linear_items();
    }

    /// Unregister a tree.
    ///
    /// The host is notified with the removed config, or `None` if the id was
    /// never registered. Does not schedule a recompute; the tree's rows stay
    /// in the cache until the next pass drops them.
    pub fn unregister_tree(&self, tree_id: &TreeId) -> Option<TreeConfig> {
        let existing = self.read(|inner| inner.registry.get(tree_id).cloned());
        if let Some(cb) = &self.shared.callbacks.on_unregister_tree {
            cb(existing.as_ref());
        }
        let removed = self.write(|inner| inner.registry.unregister(tree_id));
        if removed.is_some() {
            debug!("Unregistered tree {}", tree_id);
        } else {
            trace!("Unregister of unknown tree {} ignored", tree_id);
        }
        removed
    }

    /// Registered tree ids, in registration order.
    pub fn tree_ids(&self) -> Vec<TreeId> {
        self.read(|inner| inner.registry.tree_ids())
    }

    /// Registered configs, in registration order.
    pub fn trees(&self) -> Vec<TreeConfig> {
        self.read(|inner| inner.registry.iter().cloned().collect())
    }

    /// Config of one tree.
    pub fn tree(&self, tree_id: &TreeId) -> Option<TreeConfig> {
        self.read(|inner| inner.registry.get(tree_id).cloned())
    }

    // -------------------------------------------------------------------------
    // Linear items
    // -------------------------------------------------------------------------

    /// Schedule a recompute of every tree's rows.
    ///
    /// Never runs inline. Requests made before the pending pass runs fold
    /// into it.
    pub fn update_linear_items(&self) {
        if self.shared.pending.request() {
            trace!("Recompute scheduled");
            self.shared.wakeup.send();
        }
    }

    /// Whether a recompute is scheduled but has not run.
    pub fn is_recompute_pending(&self) -> bool {
        self.shared.pending.is_pending()
    }

    /// Number of recompute requests made so far, including coalesced ones.
    pub fn recompute_requests(&self) -> u64 {
        self.shared.pending.requests()
    }

    /// Schedule a recompute if the host changed the view state or the item
    /// source since the last pass. Returns true if a change was seen.
    pub fn sync_external_changes(&self) -> bool {
        let view_changed = self.shared.view_state.take_dirty();
        let items_changed = self.shared.items.take_dirty();
        if view_changed || items_changed {
            trace!(
                "External change (view state: {}, items: {})",
                view_changed, items_changed
            );
            self.update_linear_items();
            true
        } else {
            false
        }
    }

    /// Run the pending recompute now, if there is one.
    ///
    /// Reads the registry, view state and item source as they are at this
    /// moment. Returns `Ok(false)` if nothing was pending. If the item source
    /// fails, the previous rows are kept and the error is returned.
    pub fn flush(&self) -> Result<bool, GroveError> {
        if !self.shared.pending.take() {
            return Ok(false);
        }
        // This pass observes everything written so far.
        self.shared.view_state.clear_dirty();
        self.shared.items.clear_dirty();

        let start = Instant::now();
        let registry = self.read(|inner| inner.registry.clone());
        let result = self
            .shared
            .view_state
            .read(|view| cache::compute(&registry, view, &self.shared.items));

        match result {
            Ok(rows) => {
                let generation = self.write(|inner| inner.cache.replace(rows));
                self.shared.generation.send_replace(generation);
                debug!(
                    "Recomputed {} trees in {:?} (generation {})",
                    registry.len(),
                    start.elapsed(),
                    generation
                );
                Ok(true)
            }
            Err(err) => {
                warn!("Recompute aborted, keeping previous rows: {}", err);
                Err(err)
            }
        }
    }

    /// Rows of one tree as of the last completed pass.
    pub fn linear_items(&self, tree_id: &TreeId) -> Option<Arc<[LinearItem]>> {
        self.read(|inner| inner.cache.get(tree_id))
    }

    /// Rows of every tree as of the last completed pass.
    pub fn all_linear_items(&self) -> HashMap<TreeId, Arc<[LinearItem]>> {
        self.read(|inner| inner.cache.snapshot())
    }

    /// Number of completed passes.
    pub fn generation(&self) -> u64 {
        self.read(|inner| inner.cache.generation())
    }

    /// Watch the generation counter to react to completed passes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.generation.subscribe()
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// The tree holding logical focus.
    pub fn active_tree(&self) -> Option<TreeId> {
        self.read(|inner| inner.active.get().cloned())
    }

    /// Make `tree_id` the active tree. Returns the previous active tree.
    ///
    /// See [`update_active_tree`](Self::update_active_tree) for when the
    /// surface is focused.
    pub fn set_active_tree(
        &self,
        tree_id: Option<TreeId>,
        auto_focus_tree: bool,
    ) -> Option<TreeId> {
        self.update_active_tree(move |_| tree_id.clone(), auto_focus_tree)
    }

    /// Replace the active tree with a value computed from the current one.
    ///
    /// `f` runs without the environment lock held, so it may read the
    /// environment. The result is stored only if the active tree did not
    /// change meanwhile; otherwise `f` is called again with the newer value.
    /// If the value changed, `auto_focus_tree` and the
    /// environment's `auto_focus` are both on, and focus is not already
    /// inside the new tree, the new tree's focus target is focused.
    /// Returns the previous active tree.
    pub fn update_active_tree(
        &self,
        mut f: impl FnMut(Option<&TreeId>) -> Option<TreeId>,
        auto_focus_tree: bool,
    ) -> Option<TreeId> {
        let (previous, next) = loop {
            let current = self.active_tree();
            let next = f(current.as_ref());
            let stored = next.clone();
            if self.write(|inner| inner.active.compare_and_set(current.as_ref(), stored)) {
                break (current, next);
            }
            trace!("Active tree changed during update, retrying");
        };
        if previous != next {
            debug!("Active tree {:?} -> {:?}", previous, next);
            if let Some(tree_id) = &next
                && auto_focus_tree
                && self.shared.config.auto_focus
                && !focus::tree_has_focus(&self.shared.surface, tree_id)
            {
                focus::focus_tree(&self.shared.surface, tree_id);
            }
        }
        previous
    }

    /// Focus the element flagged as the tree's focus target.
    ///
    /// Returns false if the tree has no mounted focus target.
    pub fn focus_tree(&self, tree_id: &TreeId) -> bool {
        focus::focus_tree(&self.shared.surface, tree_id)
    }

    /// Handle a request to focus an item.
    ///
    /// Moves the surface to the item (see [`focus::focus_item`]) and
    /// forwards the request to the host unless the item already is the
    /// tree's focused item.
    pub fn on_focus_item(&self, item: &ItemId, tree_id: &TreeId) -> FocusMove {
        let moved = focus::focus_item(
            &self.shared.surface,
            tree_id,
            item,
            self.shared.config.auto_focus,
        );

        let already_focused = self
            .shared
            .view_state
            .read(|view| view.focused_item(tree_id) == Some(item));
        if already_focused {
            trace!("Item {} already focused in tree {}", item, tree_id);
        } else if let Some(cb) = &self.shared.callbacks.on_focus_item {
            cb(item, tree_id);
        }
        moved
    }
}
