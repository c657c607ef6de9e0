//! Environment configuration.

use serde::{Deserialize, Serialize};

/// Options shared by every tree of an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Move surface focus along with the logical focus.
    ///
    /// When off, the environment still tracks the active tree and forwards
    /// focus callbacks, but never touches the surface.
    pub auto_focus: bool,

    /// Buffered wakeup signals between the environment and its driver.
    pub wakeup_capacity: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            auto_focus: true,
            wakeup_capacity: 16,
        }
    }
}

impl EnvironmentConfig {
    /// Create the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether surface focus follows logical focus.
    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Set the wakeup channel capacity.
    pub fn wakeup_capacity(mut self, capacity: usize) -> Self {
        self.wakeup_capacity = capacity;
        self
    }
}
