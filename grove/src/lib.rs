//! State orchestration for tree views.
//!
//! `grove` keeps one or more trees consistent inside a single
//! [`TreeEnvironment`]: it registers trees, flattens each of them into the
//! rows a renderer draws ([`LinearItem`]), recomputes those rows whenever
//! expansion or structure change, and keeps input focus on the right tree
//! and item.
//!
//! Item structure and view state stay with the host. The environment reads
//! them through [`ItemSource`] and [`SharedState`] and never writes them,
//! unless the host opts into [`managed`] callbacks. Recomputes are always
//! deferred: requests are folded into one pending pass that runs either
//! from a spawned [`RecomputeDriver`] or from an explicit
//! [`TreeEnvironment::flush`].

pub mod cache;
pub mod callbacks;
pub mod config;
pub mod environment;
pub mod error;
pub mod focus;
pub mod ids;
pub mod item;
pub mod linear;
pub mod managed;
pub mod registry;
pub mod state;
pub mod view_state;
pub mod wakeup;

pub use callbacks::{DropTarget, EnvironmentCallbacks};
pub use config::EnvironmentConfig;
pub use environment::{DriverHandle, EnvironmentBuilder, RecomputeDriver, TreeEnvironment};
pub use error::GroveError;
pub use ids::{ItemId, TreeId};
pub use item::{ItemSource, StaticItems, TreeItem};
pub use linear::{LinearItem, linearize};
pub use registry::TreeConfig;
pub use state::SharedState;
pub use view_state::{TreeViewState, ViewState};

pub mod prelude {
    pub use crate::callbacks::{DropTarget, EnvironmentCallbacks};
    pub use crate::config::EnvironmentConfig;
    pub use crate::environment::{DriverHandle, RecomputeDriver, TreeEnvironment};
    pub use crate::error::GroveError;
    pub use crate::focus::{
        FocusMove, FocusSurface, MemoryElement, MemorySurface, NullSurface, SurfaceCall,
    };
    pub use crate::ids::{ItemId, TreeId};
    pub use crate::item::{ItemSource, StaticItems, TreeItem};
    pub use crate::linear::LinearItem;
    pub use crate::registry::TreeConfig;
    pub use crate::state::SharedState;
    pub use crate::view_state::{TreeViewState, ViewState};
}
