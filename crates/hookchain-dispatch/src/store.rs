//! Hook store: an isolated registry plus the executor that runs it.

use std::fmt;
use std::sync::{Arc, Weak};

use hookchain_core::config::dispatch::DispatchConfig;
use hookchain_core::error::HookError;

use crate::hooks::definitions::{Phase, WorkItem};
use crate::hooks::executor::Executor;
use crate::hooks::registry::{Task, TaskRegistry};

/// Registers work against actions and invokes them.
///
/// Cloning a store yields another handle to the same tasks. Every call to
/// [`HookStore::new`] or [`HookStore::with_config`] creates a fresh, isolated
/// table.
///
/// `C` is the context threaded through jobs. It is cloned before each work
/// item so that failures, aborts and [`Outcome::Unchanged`] can restore the
/// prior value; contexts whose clones share state (such as `Arc<Mutex<_>>`)
/// therefore keep in-place mutations made by a failing or aborting job.
///
/// [`Outcome::Unchanged`]: crate::hooks::definitions::Outcome::Unchanged
pub struct HookStore<C, E = HookError> {
    /// Action → task table.
    registry: Arc<TaskRegistry<C, E>>,
    /// Executor reading from `registry`.
    executor: Arc<Executor<C, E>>,
}

impl<C, E> HookStore<C, E> {
    /// Creates an empty store with unbounded nesting.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Creates an empty store with the given executor settings.
    pub fn with_config(config: DispatchConfig) -> Self {
        let registry = Arc::new(TaskRegistry::new());
        let executor = Arc::new(Executor::new(registry.clone(), config));

        Self { registry, executor }
    }

    /// Looks up the task registered for `action`.
    pub async fn find(&self, action: &str) -> Option<Arc<Task<C, E>>> {
        self.registry.find(action).await
    }

    /// Returns the task for `action`, creating an empty one if needed.
    pub async fn find_or_create(&self, action: &str) -> Arc<Task<C, E>> {
        self.registry.find_or_create(action).await
    }

    /// Appends `item` to the main phase of `action`.
    pub async fn hook(&self, action: &str, item: WorkItem<C, E>) {
        self.registry.register(action, Phase::Works, item).await;
    }

    /// Appends `item` to the pre phase of `action`.
    pub async fn pre(&self, action: &str, item: WorkItem<C, E>) {
        self.registry.register(action, Phase::Pre, item).await;
    }

    /// Appends `item` to the post phase of `action`.
    pub async fn post(&self, action: &str, item: WorkItem<C, E>) {
        self.registry.register(action, Phase::Post, item).await;
    }

    /// Returns the executor settings.
    pub fn config(&self) -> &DispatchConfig {
        self.executor.config()
    }

    /// Returns a handle that does not keep the store alive.
    ///
    /// Jobs that re-invoke their own store should capture this instead of a
    /// clone, which would form a reference cycle through the registry.
    pub fn downgrade(&self) -> WeakHookStore<C, E> {
        WeakHookStore {
            registry: Arc::downgrade(&self.registry),
            executor: Arc::downgrade(&self.executor),
        }
    }

    /// Returns whether two handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }
}

impl<C, E> HookStore<C, E>
where
    C: Clone + Send + 'static,
    E: From<HookError> + fmt::Display + Send + 'static,
{
    /// Runs `action` against `context` with no pending error.
    pub async fn invoke(&self, action: &str, context: C) -> Result<C, E> {
        self.executor.invoke(action, context).await
    }

    /// Runs `action` against `context`, starting with `err` pending.
    ///
    /// Useful for forwarding a pending error from inside an error-aware job.
    pub async fn invoke_with(&self, action: &str, context: C, err: Option<E>) -> Result<C, E> {
        self.executor.invoke_with(action, context, err).await
    }
}

impl<C, E> Clone for HookStore<C, E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<C, E> Default for HookStore<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for HookStore<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookStore")
            .field("config", self.config())
            .finish_non_exhaustive()
    }
}

/// Non-owning handle to a [`HookStore`].
pub struct WeakHookStore<C, E = HookError> {
    registry: Weak<TaskRegistry<C, E>>,
    executor: Weak<Executor<C, E>>,
}

impl<C, E> WeakHookStore<C, E> {
    /// Returns the store if it is still alive.
    pub fn upgrade(&self) -> Option<HookStore<C, E>> {
        Some(HookStore {
            registry: self.registry.upgrade()?,
            executor: self.executor.upgrade()?,
        })
    }
}

impl<C, E> Clone for WeakHookStore<C, E> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
            executor: Weak::clone(&self.executor),
        }
    }
}

impl<C, E> fmt::Debug for WeakHookStore<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakHookStore").finish_non_exhaustive()
    }
}
