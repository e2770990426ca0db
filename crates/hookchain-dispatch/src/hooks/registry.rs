//! Task registry: one task per action, each holding pre/works/post sequences.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::definitions::{Phase, WorkItem};

/// The work registered for one action.
///
/// Sequences are append-only. A task is shared by every lookup of its action,
/// so callers may compare tasks with [`Arc::ptr_eq`].
pub struct Task<C, E> {
    pre: RwLock<Vec<WorkItem<C, E>>>,
    works: RwLock<Vec<WorkItem<C, E>>>,
    post: RwLock<Vec<WorkItem<C, E>>>,
}

impl<C, E> Task<C, E> {
    fn new() -> Self {
        Self {
            pre: RwLock::new(Vec::new()),
            works: RwLock::new(Vec::new()),
            post: RwLock::new(Vec::new()),
        }
    }

    fn sequence(&self, phase: Phase) -> &RwLock<Vec<WorkItem<C, E>>> {
        match phase {
            Phase::Pre => &self.pre,
            Phase::Works => &self.works,
            Phase::Post => &self.post,
        }
    }

    /// Returns a snapshot of the items registered for `phase`.
    pub async fn items(&self, phase: Phase) -> Vec<WorkItem<C, E>> {
        self.sequence(phase).read().await.clone()
    }

    /// Returns a snapshot of the pre phase.
    pub async fn pre(&self) -> Vec<WorkItem<C, E>> {
        self.items(Phase::Pre).await
    }

    /// Returns a snapshot of the main phase.
    pub async fn works(&self) -> Vec<WorkItem<C, E>> {
        self.items(Phase::Works).await
    }

    /// Returns a snapshot of the post phase.
    pub async fn post(&self) -> Vec<WorkItem<C, E>> {
        self.items(Phase::Post).await
    }

    /// Returns the number of items registered for `phase`.
    pub async fn len(&self, phase: Phase) -> usize {
        self.sequence(phase).read().await.len()
    }

    async fn push(&self, phase: Phase, item: WorkItem<C, E>) {
        self.sequence(phase).write().await.push(item);
    }
}

impl<C, E> fmt::Debug for Task<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

/// Registry of tasks keyed by action name.
pub struct TaskRegistry<C, E> {
    /// Action → task.
    tasks: RwLock<HashMap<String, Arc<Task<C, E>>>>,
}

impl<C, E> TaskRegistry<C, E> {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Looks up the task for `action` without creating it.
    pub async fn find(&self, action: &str) -> Option<Arc<Task<C, E>>> {
        self.tasks.read().await.get(action).cloned()
    }

    /// Returns the task for `action`, creating an empty one on first use.
    pub async fn find_or_create(&self, action: &str) -> Arc<Task<C, E>> {
        if let Some(task) = self.find(action).await {
            return task;
        }

        let mut tasks = self.tasks.write().await;
        tasks
            .entry(action.to_string())
            .or_insert_with(|| {
                debug!(action = %action, "Task created");
                Arc::new(Task::new())
            })
            .clone()
    }

    /// Appends `item` to the `phase` sequence of `action`.
    pub async fn register(&self, action: &str, phase: Phase, item: WorkItem<C, E>) {
        let kind = item.kind();
        let task = self.find_or_create(action).await;
        task.push(phase, item).await;

        debug!(
            action = %action,
            phase = %phase,
            kind = kind,
            "Work item registered"
        );
    }

    /// Returns whether a task exists for `action`.
    pub async fn contains(&self, action: &str) -> bool {
        self.tasks.read().await.contains_key(action)
    }

    /// Returns the number of registered actions.
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

impl<C, E> Default for TaskRegistry<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for TaskRegistry<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry").finish_non_exhaustive()
    }
}
