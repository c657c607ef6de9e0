//! Focus coordination between trees.
//!
//! The environment tracks which tree holds logical focus and keeps the
//! rendering surface's input focus in line with it. The surface is reached
//! only through [`FocusSurface`], so the logic runs the same against a real
//! renderer, a terminal, or the recording [`MemorySurface`].

mod coordinator;
pub mod memory;
mod surface;

pub use coordinator::{ActiveTree, FocusMove, focus_item, focus_tree, tree_has_focus};
pub use memory::{MemoryElement, MemorySurface, SurfaceCall};
pub use surface::{FocusSurface, NullSurface};
