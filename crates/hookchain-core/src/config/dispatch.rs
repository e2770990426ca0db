//! Executor configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to a hook store's executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum nesting depth of invocations; `None` means unbounded.
    ///
    /// The root invocation has depth 0. Nested action references and
    /// invocations made from inside a job each add one level. Actions with
    /// nothing registered pass through without being checked. Depth is
    /// tracked per tokio task, so invocations from work a job hands to
    /// `tokio::spawn` start again at depth 0.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl DispatchConfig {
    /// Returns a configuration with the given depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}
