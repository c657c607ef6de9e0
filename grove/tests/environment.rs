//! Behavior of a tree environment driven through explicit flushes.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use grove::prelude::*;

fn sample_items() -> StaticItems {
    StaticItems::from_items([
        TreeItem::folder("r", ["a", "b"]),
        TreeItem::folder("a", ["a1"]),
        TreeItem::leaf("a1"),
        TreeItem::leaf("b"),
    ])
}

fn names(rows: &[LinearItem]) -> Vec<&str> {
    rows.iter().map(|r| r.item.as_str()).collect()
}

fn env_with_view() -> (
    TreeEnvironment<StaticItems, NullSurface>,
    SharedState<ViewState>,
) {
    let view = SharedState::new(ViewState::default());
    let env = TreeEnvironment::builder(SharedState::new(sample_items()), view.clone(), NullSurface)
        .build();
    (env, view)
}

// =============================================================================
// Linearization through the environment
// =============================================================================

#[test]
fn test_expanding_reveals_children() {
    let (env, view) = env_with_view();
    env.register_tree(TreeConfig::new("t1", "r").render_root(true));
    env.flush().unwrap();
    assert_eq!(names(&env.linear_items(&"t1".into()).unwrap()), ["r", "a", "b"]);

    view.update(|v| v.tree_mut("t1").expand("a"));
    env.on_expand_item(&"a".into(), &"t1".into());
    env.flush().unwrap();
    let rows = env.linear_items(&"t1".into()).unwrap();
    assert_eq!(names(&rows), ["r", "a", "a1", "b"]);
    assert_eq!(rows.iter().map(|r| r.depth).collect::<Vec<_>>(), [0, 1, 2, 1]);
}

#[test]
fn test_reregistering_same_config_is_idempotent() {
    let (env, _) = env_with_view();
    env.register_tree(TreeConfig::new("t1", "r"));
    env.flush().unwrap();
    let first = env.linear_items(&"t1".into()).unwrap();

    env.register_tree(TreeConfig::new("t1", "r"));
    env.flush().unwrap();
    let second = env.linear_items(&"t1".into()).unwrap();

    assert_eq!(first, second);
    assert_eq!(env.tree_ids(), vec![TreeId::from("t1")]);
}

#[test]
fn test_collapsed_length_matches_root_children() {
    let (env, _) = env_with_view();
    env.register_tree(TreeConfig::new("plain", "r"));
    env.register_tree(TreeConfig::new("rooted", "r").render_root(true));
    env.flush().unwrap();

    assert_eq!(env.linear_items(&"plain".into()).unwrap().len(), 2);
    assert_eq!(env.linear_items(&"rooted".into()).unwrap().len(), 3);
}

#[test]
fn test_expand_collapse_round_trip() {
    let (env, view) = env_with_view();
    env.register_tree(TreeConfig::new("t1", "r"));
    env.flush().unwrap();
    let before = env.linear_items(&"t1".into()).unwrap();

    view.update(|v| v.tree_mut("t1").expand("a"));
    env.on_expand_item(&"a".into(), &"t1".into());
    env.flush().unwrap();
    assert_ne!(env.linear_items(&"t1".into()).unwrap(), before);

    view.update(|v| v.tree_mut("t1").collapse(&"a".into()));
    env.on_collapse_item(&"a".into(), &"t1".into());
    env.flush().unwrap();
    assert_eq!(env.linear_items(&"t1".into()).unwrap(), before);
}

#[test]
fn test_trees_have_independent_view_state() {
    let (env, view) = env_with_view();
    env.register_tree(TreeConfig::new("left", "r"));
    env.register_tree(TreeConfig::new("right", "r"));
    view.update(|v| v.tree_mut("left").expand("a"));
    env.flush().unwrap();

    assert_eq!(names(&env.linear_items(&"left".into()).unwrap()), ["a", "a1", "b"]);
    assert_eq!(names(&env.linear_items(&"right".into()).unwrap()), ["a", "b"]);
}

#[test]
fn test_unregister_leaves_stale_rows_until_next_pass() {
    let (env, _) = env_with_view();
    env.register_tree(TreeConfig::new("t1", "r"));
    env.register_tree(TreeConfig::new("t2", "r"));
    env.flush().unwrap();

    env.unregister_tree(&"t1".into());
    assert_eq!(env.tree_ids(), vec![TreeId::from("t2")]);
    assert!(env.linear_items(&"t1".into()).is_some());
    assert!(!env.is_recompute_pending());

    env.update_linear_items();
    env.flush().unwrap();
    assert!(env.linear_items(&"t1".into()).is_none());
    assert!(env.linear_items(&"t2".into()).is_some());
}

#[test]
fn test_register_callback_sees_config() {
    let seen: Arc<Mutex<Vec<TreeConfig>>> = Arc::default();
    let log = Arc::clone(&seen);
    let env = TreeEnvironment::builder(
        SharedState::new(sample_items()),
        SharedState::default(),
        NullSurface,
    )
    .callbacks(EnvironmentCallbacks::new().on_register_tree(move |config| {
        log.lock().unwrap().push(config.clone());
    }))
    .build();

    let config = TreeConfig::new("t1", "r").label("Files");
    env.register_tree(config.clone());
    assert_eq!(*seen.lock().unwrap(), vec![config]);
}

// =============================================================================
// Failing sources
// =============================================================================

/// Wraps a static source and fails on demand.
struct Flaky {
    inner: StaticItems,
    failing: Arc<AtomicBool>,
}

impl ItemSource for Flaky {
    fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GroveError::item_source(item.clone(), "connection reset"));
        }
        self.inner.children(item)
    }

    fn is_branch(&self, item: &ItemId) -> Result<bool, GroveError> {
        self.inner.is_branch(item)
    }
}

#[test]
fn test_failed_pass_keeps_previous_rows() {
    let failing = Arc::new(AtomicBool::new(false));
    let source = Flaky {
        inner: sample_items(),
        failing: Arc::clone(&failing),
    };
    let view = SharedState::new(ViewState::default());
    let env = TreeEnvironment::builder(SharedState::new(source), view.clone(), NullSurface).build();
    env.register_tree(TreeConfig::new("t1", "r"));
    env.flush().unwrap();
    let good = env.linear_items(&"t1".into()).unwrap();

    failing.store(true, Ordering::SeqCst);
    view.update(|v| v.tree_mut("t1").expand("a"));
    env.update_linear_items();
    let err = env.flush().unwrap_err();
    assert!(matches!(err, GroveError::Source { .. }));
    assert_eq!(env.linear_items(&"t1".into()).unwrap(), good);
    assert_eq!(env.generation(), 1);

    failing.store(false, Ordering::SeqCst);
    env.update_linear_items();
    env.flush().unwrap();
    assert_eq!(names(&env.linear_items(&"t1".into()).unwrap()), ["a", "a1", "b"]);
}

// =============================================================================
// Focus
// =============================================================================

fn focus_env(
    callbacks: EnvironmentCallbacks,
) -> (
    TreeEnvironment<StaticItems, Arc<MemorySurface>>,
    SharedState<ViewState>,
    Arc<MemorySurface>,
) {
    let surface = Arc::new(MemorySurface::new());
    surface.mount_tree("t1", ["a", "b"]);
    let view = SharedState::new(ViewState::default());
    let env = TreeEnvironment::builder(
        SharedState::new(sample_items()),
        view.clone(),
        Arc::clone(&surface),
    )
    .callbacks(callbacks)
    .build();
    env.register_tree(TreeConfig::new("t1", "r"));
    (env, view, surface)
}

#[test]
fn test_activating_tree_focuses_its_target() {
    let (env, _, surface) = focus_env(EnvironmentCallbacks::new());
    surface.set_focus_target(&"t1".into(), Some("a".into()));
    surface.set_active(Some(MemoryElement::Outside("body".into())));

    env.set_active_tree(Some("t1".into()), true);
    assert_eq!(
        surface.active(),
        Some(MemoryElement::Item("t1".into(), "a".into()))
    );
}

#[test]
fn test_focus_tree_without_target_is_noop() {
    let (env, _, surface) = focus_env(EnvironmentCallbacks::new());
    assert!(!env.focus_tree(&"t1".into()));
    assert!(!env.focus_tree(&"unmounted".into()));
    assert!(surface.calls().is_empty());
}

#[test]
fn test_focus_item_moves_focus_and_notifies() {
    let seen: Arc<Mutex<Vec<ItemId>>> = Arc::default();
    let log = Arc::clone(&seen);
    let (env, _, surface) = focus_env(EnvironmentCallbacks::new().on_focus_item(move |item, _| {
        log.lock().unwrap().push(item.clone());
    }));

    let moved = env.on_focus_item(&"b".into(), &"t1".into());
    assert_eq!(moved, FocusMove::Focused);
    assert_eq!(
        surface.calls(),
        vec![SurfaceCall::Focus(MemoryElement::Item("t1".into(), "b".into()))]
    );
    assert_eq!(*seen.lock().unwrap(), vec![ItemId::from("b")]);
}

#[test]
fn test_search_input_keeps_focus() {
    let (env, _, surface) = focus_env(EnvironmentCallbacks::new());
    let tree = TreeId::from("t1");
    surface.mount_search_input(&tree);
    surface.set_active(Some(MemoryElement::SearchInput(tree.clone())));

    let moved = env.on_focus_item(&"b".into(), &tree);
    assert_eq!(moved, FocusMove::Scrolled);
    assert_eq!(
        surface.calls(),
        vec![SurfaceCall::ScrollIntoView(MemoryElement::Item(tree.clone(), "b".into()))]
    );
    assert_eq!(surface.active(), Some(MemoryElement::SearchInput(tree)));
}

#[test]
fn test_refocusing_focused_item_is_not_forwarded() {
    let seen: Arc<Mutex<Vec<ItemId>>> = Arc::default();
    let log = Arc::clone(&seen);
    let (env, view, _) = focus_env(EnvironmentCallbacks::new().on_focus_item(move |item, _| {
        log.lock().unwrap().push(item.clone());
    }));
    view.update(|v| v.tree_mut("t1").focused_item = Some("a".into()));

    env.on_focus_item(&"a".into(), &"t1".into());
    assert!(seen.lock().unwrap().is_empty());

    env.on_focus_item(&"b".into(), &"t1".into());
    assert_eq!(*seen.lock().unwrap(), vec![ItemId::from("b")]);
}

#[test]
fn test_unmounted_item_still_notifies() {
    let seen: Arc<Mutex<Vec<ItemId>>> = Arc::default();
    let log = Arc::clone(&seen);
    let (env, _, surface) = focus_env(EnvironmentCallbacks::new().on_focus_item(move |item, _| {
        log.lock().unwrap().push(item.clone());
    }));

    let moved = env.on_focus_item(&"a1".into(), &"t1".into());
    assert_eq!(moved, FocusMove::Skipped);
    assert!(surface.calls().is_empty());
    assert_eq!(*seen.lock().unwrap(), vec![ItemId::from("a1")]);
}
