//! Flattening a tree into the rows it renders as.

use serde::{Deserialize, Serialize};

use crate::error::GroveError;
use crate::ids::ItemId;
use crate::item::ItemSource;
use crate::view_state::TreeViewState;

/// A visible row in the linearized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearItem {
    /// The item shown on this row.
    pub item: ItemId,
    /// Depth in the rendered tree (0 = top level).
    pub depth: usize,
    /// The item's parent, `None` for a rendered root.
    pub parent: Option<ItemId>,
    /// First among its siblings.
    pub is_first_child: bool,
    /// Last among its siblings.
    pub is_last_child: bool,
    /// Whether the item can hold children.
    pub is_branch: bool,
    /// Whether the item's children follow this row.
    pub is_expanded: bool,
}

/// Siblings still to be visited at one level of the traversal.
struct Level {
    parent: ItemId,
    children: Vec<ItemId>,
    next: usize,
    depth: usize,
}

/// Linearize the tree under `root` into its visible rows.
///
/// Performs a pre-order traversal. The root's children are always visited;
/// any other item's children are visited only if the item is a branch and is
/// expanded in `view`. With `render_root` the root itself is the first row,
/// at depth 0, and its children start at depth 1.
///
/// Items unknown to `source` are emitted as leaves. Collapsed subtrees are
/// never read, so the cost is proportional to the number of visible rows.
/// An error from `source` aborts the traversal.
pub fn linearize<S>(
    root: &ItemId,
    view: &TreeViewState,
    source: &S,
    render_root: bool,
) -> Result<Vec<LinearItem>, GroveError>
where
    S: ItemSource + ?Sized,
{
    let mut out = Vec::new();
    let base_depth = if render_root {
        // The root's children are always shown, so only a leaf root reads
        // as collapsed.
        let is_branch = source.is_branch(root)?;
        out.push(LinearItem {
            item: root.clone(),
            depth: 0,
            parent: None,
            is_first_child: true,
            is_last_child: true,
            is_branch,
            is_expanded: is_branch,
        });
        1
    } else {
        0
    };

    let mut stack = Vec::new();
    if let Some(children) = source.children(root)? {
        stack.push(Level {
            parent: root.clone(),
            children,
            next: 0,
            depth: base_depth,
        });
    }

    // Iterative so deep trees cannot overflow the call stack.
    while let Some(level) = stack.last_mut() {
        let Some(item) = level.children.get(level.next).cloned() else {
            stack.pop();
            continue;
        };
        let index = level.next;
        level.next += 1;

        let depth = level.depth;
        let parent = level.parent.clone();
        let is_last_child = index + 1 == level.children.len();
        let is_branch = source.is_branch(&item)?;
        let is_expanded = is_branch && view.is_expanded(&item);

        let children = if is_expanded {
            source.children(&item)?
        } else {
            None
        };

        out.push(LinearItem {
            item: item.clone(),
            depth,
            parent: Some(parent),
            is_first_child: index == 0,
            is_last_child,
            is_branch,
            is_expanded,
        });

        if let Some(children) = children.filter(|c| !c.is_empty()) {
            stack.push(Level {
                parent: item,
                children,
                next: 0,
                depth: depth + 1,
            });
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::item::{StaticItems, TreeItem};

    fn sample() -> StaticItems {
        StaticItems::from_items([
            TreeItem::folder("r", ["a", "b"]),
            TreeItem::folder("a", ["a1"]),
            TreeItem::leaf("a1"),
            TreeItem::folder("b", ["b1", "ghost"]),
            TreeItem::leaf("b1"),
        ])
    }

    fn ids(items: &[LinearItem]) -> Vec<&str> {
        items.iter().map(|i| i.item.as_str()).collect()
    }

    #[test]
    fn test_collapsed_tree_lists_root_children() {
        let rows = linearize(&"r".into(), &TreeViewState::default(), &sample(), false).unwrap();
        assert_eq!(ids(&rows), ["a", "b"]);
        assert!(rows.iter().all(|r| r.depth == 0));
    }

    #[test]
    fn test_render_root_adds_depth_zero_row() {
        let rows = linearize(&"r".into(), &TreeViewState::default(), &sample(), true).unwrap();
        assert_eq!(ids(&rows), ["r", "a", "b"]);
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[0].parent, None);
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn test_rendered_leaf_root_is_not_expanded() {
        let items = StaticItems::from_items([TreeItem::leaf("solo")]);
        let rows = linearize(&"solo".into(), &TreeViewState::default(), &items, true).unwrap();
        assert_eq!(ids(&rows), ["solo"]);
        assert!(!rows[0].is_branch);
        assert!(!rows[0].is_expanded);

        let rows = linearize(&"r".into(), &TreeViewState::default(), &sample(), true).unwrap();
        assert!(rows[0].is_branch);
        assert!(rows[0].is_expanded);
    }

    #[test]
    fn test_expanded_children_follow_parent() {
        let mut view = TreeViewState::default();
        view.expand("a");
        view.expand("b");
        let rows = linearize(&"r".into(), &view, &sample(), false).unwrap();
        assert_eq!(ids(&rows), ["a", "a1", "b", "b1", "ghost"]);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].parent, Some(ItemId::from("a")));
    }

    #[test]
    fn test_sibling_flags() {
        let mut view = TreeViewState::default();
        view.expand("b");
        let rows = linearize(&"r".into(), &view, &sample(), false).unwrap();
        let flags: Vec<(bool, bool)> = rows
            .iter()
            .map(|r| (r.is_first_child, r.is_last_child))
            .collect();
        // a, b, b1, ghost
        assert_eq!(flags, [(true, false), (false, true), (true, false), (false, true)]);
    }

    #[test]
    fn test_missing_child_is_a_leaf() {
        let mut view = TreeViewState::default();
        view.expand("b");
        view.expand("ghost");
        let rows = linearize(&"r".into(), &view, &sample(), false).unwrap();
        let ghost = rows.iter().find(|r| r.item.as_str() == "ghost").unwrap();
        assert!(!ghost.is_branch);
        assert!(!ghost.is_expanded);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let rows =
            linearize(&"nope".into(), &TreeViewState::default(), &sample(), false).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_expanded_leaf_is_not_descended() {
        let mut view = TreeViewState::default();
        view.expand("a1");
        let rows = linearize(&"r".into(), &view, &sample(), false).unwrap();
        assert_eq!(ids(&rows), ["a", "b"]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 70_000;
        let mut items = StaticItems::new();
        let mut view = TreeViewState::default();
        for i in 0..depth {
            items.insert(TreeItem::folder(format!("n{i}"), [format!("n{}", i + 1)]));
            view.expand(format!("n{i}"));
        }
        items.insert(TreeItem::leaf(format!("n{depth}")));
        let rows = linearize(&"n0".into(), &view, &items, false).unwrap();
        assert_eq!(rows.len(), depth);
        assert_eq!(rows.last().map(|r| r.depth), Some(depth - 1));
    }

    /// Counts how often children are requested.
    struct Counting {
        inner: StaticItems,
        children_calls: AtomicUsize,
    }

    impl ItemSource for Counting {
        fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError> {
            self.children_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.children(item)
        }

        fn is_branch(&self, item: &ItemId) -> Result<bool, GroveError> {
            self.inner.is_branch(item)
        }
    }

    #[test]
    fn test_collapsed_subtrees_are_not_read() {
        let source = Counting {
            inner: sample(),
            children_calls: AtomicUsize::new(0),
        };
        linearize(&"r".into(), &TreeViewState::default(), &source, false).unwrap();
        // Only the root's children.
        assert_eq!(source.children_calls.load(Ordering::SeqCst), 1);
    }

    struct Failing;

    impl ItemSource for Failing {
        fn children(&self, item: &ItemId) -> Result<Option<Vec<ItemId>>, GroveError> {
            Err(GroveError::item_source(item.clone(), "backend offline"))
        }

        fn is_branch(&self, _item: &ItemId) -> Result<bool, GroveError> {
            Ok(true)
        }
    }

    #[test]
    fn test_source_error_aborts() {
        let err = linearize(&"r".into(), &TreeViewState::default(), &Failing, false).unwrap_err();
        assert_eq!(err, GroveError::item_source("r", "backend offline"));
    }
}
