//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hookchain::hookchain_core::config::logging::LoggingConfig;
use hookchain::hookchain_core::logging;

/// Counter whose clones share one value, so increments survive the context
/// being restored after a failure or an abort.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new value.
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current value.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether both handles share one value.
    pub fn same_as(&self, other: &Counter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Install a quiet subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = logging::init(&LoggingConfig {
        level: "warn".to_string(),
        format: "pretty".to_string(),
    });
}
