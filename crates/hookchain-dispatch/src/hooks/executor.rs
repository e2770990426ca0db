//! Phase and task executors.
//!
//! An invocation looks up the task for an action and runs its `pre`, `works`
//! and `post` sequences in order against one execution record:
//!
//! - Plain jobs are skipped while an error is pending.
//! - Error-aware jobs always run; succeeding clears the pending error.
//! - Action references re-enter [`Executor::invoke_with`] with the current
//!   context and pending error, and complete before the next item starts.
//! - [`Outcome::Abort`] reverts the context to its value before the aborting
//!   item, drops the pending error, and skips every remaining item and phase.
//!
//! Invoking an action with no task is a no-op that hands back the context, or
//! the pending error if there is one. The depth limit only applies to
//! invocations that have a task to run.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{Instrument, debug, debug_span, trace, warn};
use uuid::Uuid;

use hookchain_core::config::dispatch::DispatchConfig;
use hookchain_core::error::HookError;

use super::definitions::{ErrorAwareJob, Job, Outcome, Phase, WorkItem};
use super::registry::TaskRegistry;

tokio::task_local! {
    static DEPTH: usize;
}

/// Nesting depth of the invocation currently running on this task.
///
/// Zero outside of any job. Inside a job or nested action of an invocation at
/// depth `n`, this is `n + 1`.
pub fn current_depth() -> usize {
    DEPTH.try_with(|depth| *depth).unwrap_or(0)
}

/// Transient state of one invocation, shared by its three phases.
struct ExecutionRecord<C, E> {
    context: C,
    err: Option<E>,
    done: bool,
}

impl<C, E> ExecutionRecord<C, E> {
    fn new(context: C, err: Option<E>) -> Self {
        Self {
            context,
            err,
            done: false,
        }
    }

    fn finish(self) -> Result<C, E> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.context),
        }
    }
}

/// Runs registered work for actions.
pub struct Executor<C, E> {
    registry: Arc<TaskRegistry<C, E>>,
    config: DispatchConfig,
}

impl<C, E> Executor<C, E> {
    /// Creates an executor over `registry`.
    pub fn new(registry: Arc<TaskRegistry<C, E>>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the registry this executor reads from.
    pub fn registry(&self) -> &Arc<TaskRegistry<C, E>> {
        &self.registry
    }

    /// Returns the executor settings.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

impl<C, E> Executor<C, E>
where
    C: Clone + Send + 'static,
    E: From<HookError> + fmt::Display + Send + 'static,
{
    /// Invokes `action` with no pending error.
    pub async fn invoke(&self, action: &str, context: C) -> Result<C, E> {
        self.invoke_with(action, context, None).await
    }

    /// Invokes `action`, seeding the invocation with `err` as the pending error.
    pub fn invoke_with<'a>(
        &'a self,
        action: &'a str,
        context: C,
        err: Option<E>,
    ) -> BoxFuture<'a, Result<C, E>> {
        async move {
            let depth = current_depth();
            let span = debug_span!(
                "invoke",
                action = %action,
                depth,
                invocation_id = %Uuid::new_v4()
            );
            self.execute(action, context, err, depth)
                .instrument(span)
                .await
        }
        .boxed()
    }

    async fn execute(
        &self,
        action: &str,
        context: C,
        err: Option<E>,
        depth: usize,
    ) -> Result<C, E> {
        let Some(task) = self.registry.find(action).await else {
            trace!(action = %action, "No task registered, passing through");
            return match err {
                Some(err) => Err(err),
                None => Ok(context),
            };
        };

        // Only invocations with work to run count against the limit.
        if let Some(max_depth) = self.config.max_depth {
            if depth > max_depth {
                warn!(
                    action = %action,
                    depth,
                    max_depth,
                    "Invocation exceeded maximum depth"
                );
                return Err(HookError::depth_exceeded(action, depth, max_depth).into());
            }
        }

        let mut record = ExecutionRecord::new(context, err);

        for phase in Phase::ALL {
            let items = task.items(phase).await;
            self.run_phase(phase, &items, &mut record, depth).await;
            if record.done {
                break;
            }
        }

        record.finish()
    }

    async fn run_phase(
        &self,
        phase: Phase,
        items: &[WorkItem<C, E>],
        record: &mut ExecutionRecord<C, E>,
        depth: usize,
    ) {
        // record.context keeps the prior value until an item succeeds.
        for (index, item) in items.iter().enumerate() {
            let context = record.context.clone();

            let result = match item {
                WorkItem::Action(target) => {
                    trace!(phase = %phase, index, target = %target, "Invoking nested action");
                    let err = record.err.take();
                    DEPTH
                        .scope(depth + 1, self.invoke_with(target, context, err))
                        .await
                        .map(Outcome::Continue)
                }
                WorkItem::Job(job) => {
                    if record.err.is_some() {
                        trace!(phase = %phase, index, "Skipping job while an error is pending");
                        continue;
                    }
                    trace!(phase = %phase, index, "Running job");
                    DEPTH.scope(depth + 1, job.run(context)).await
                }
                WorkItem::ErrorAware(job) => {
                    let err = record.err.take();
                    let had_error = err.is_some();
                    trace!(phase = %phase, index, had_error, "Running error-aware job");
                    let result = DEPTH.scope(depth + 1, job.run(context, err)).await;
                    if had_error && result.is_ok() {
                        debug!(phase = %phase, index, "Pending error cleared");
                    }
                    result
                }
            };

            match result {
                Ok(Outcome::Continue(next)) => record.context = next,
                Ok(Outcome::Unchanged) => {}
                Ok(Outcome::Abort) => {
                    debug!(phase = %phase, index, kind = item.kind(), "Invocation aborted");
                    record.err = None;
                    record.done = true;
                    return;
                }
                Err(err) => {
                    debug!(phase = %phase, index, kind = item.kind(), error = %err, "Work item failed");
                    record.err = Some(err);
                }
            }
        }
    }
}

impl<C, E> fmt::Debug for Executor<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookchain_core::error::ErrorKind;

    fn executor() -> Executor<u32, HookError> {
        Executor::new(Arc::new(TaskRegistry::new()), DispatchConfig::default())
    }

    fn add(n: u32) -> WorkItem<u32, HookError> {
        WorkItem::job(move |ctx: u32| async move { Ok(Outcome::Continue(ctx + n)) })
    }

    fn fail(message: &'static str) -> WorkItem<u32, HookError> {
        WorkItem::job(move |_ctx: u32| async move { Err(HookError::job(message)) })
    }

    #[tokio::test]
    async fn test_unregistered_action_passes_through() {
        let exec = executor();
        assert_eq!(exec.invoke("nothing", 5).await.unwrap(), 5);

        let err = exec
            .invoke_with("nothing", 5, Some(HookError::job("pending")))
            .await
            .unwrap_err();
        assert_eq!(err.message, "pending");
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let exec = executor();
        let registry = exec.registry();
        registry
            .register("calc", Phase::Post, WorkItem::job(|n: u32| async move { Ok(Outcome::Continue(n * 10)) }))
            .await;
        registry.register("calc", Phase::Works, add(2)).await;
        registry.register("calc", Phase::Pre, add(1)).await;

        assert_eq!(exec.invoke("calc", 0).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_unchanged_keeps_prior_context() {
        let exec = executor();
        let registry = exec.registry();
        registry.register("calc", Phase::Works, add(1)).await;
        registry
            .register("calc", Phase::Works, WorkItem::job(|_n: u32| async move { Ok(Outcome::Unchanged) }))
            .await;
        registry.register("calc", Phase::Works, add(1)).await;

        assert_eq!(exec.invoke("calc", 0).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_abort_reverts_to_prior_value_and_skips_later_phases() {
        let exec = executor();
        let registry = exec.registry();
        registry.register("calc", Phase::Pre, add(1)).await;
        registry.register("calc", Phase::Works, add(10)).await;
        registry
            .register(
                "calc",
                Phase::Works,
                WorkItem::job(|_n: u32| async move { Ok(Outcome::Abort) }),
            )
            .await;
        registry.register("calc", Phase::Works, add(100)).await;
        registry.register("calc", Phase::Post, add(1000)).await;

        assert_eq!(exec.invoke("calc", 0).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_abort_clears_pending_error() {
        let exec = executor();
        let registry = exec.registry();
        registry.register("calc", Phase::Pre, fail("early")).await;
        registry
            .register(
                "calc",
                Phase::Works,
                WorkItem::error_aware(|_n: u32, _err| async move { Ok(Outcome::Abort) }),
            )
            .await;

        assert_eq!(exec.invoke("calc", 4).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_failure_keeps_prior_context_and_skips_plain_jobs() {
        let exec = executor();
        let registry = exec.registry();
        registry.register("calc", Phase::Pre, add(1)).await;
        registry.register("calc", Phase::Works, fail("broken")).await;
        registry.register("calc", Phase::Works, add(100)).await;
        registry
            .register(
                "calc",
                Phase::Post,
                WorkItem::error_aware(|n: u32, err: Option<HookError>| async move {
                    assert_eq!(n, 1);
                    assert_eq!(err.map(|e| e.message), Some("broken".to_string()));
                    Ok(Outcome::Continue(n))
                }),
            )
            .await;

        assert_eq!(exec.invoke("calc", 0).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_error_aware_failure_replaces_pending_error() {
        let exec = executor();
        let registry = exec.registry();
        registry.register("calc", Phase::Works, fail("first")).await;
        registry
            .register(
                "calc",
                Phase::Post,
                WorkItem::error_aware(|_n: u32, _err| async move {
                    Err(HookError::internal("second"))
                }),
            )
            .await;

        let err = exec.invoke("calc", 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, "second");
    }

    #[tokio::test]
    async fn test_action_ref_receives_pending_error() {
        let exec = executor();
        let registry = exec.registry();
        registry
            .register(
                "recover",
                Phase::Works,
                WorkItem::error_aware(|n: u32, err: Option<HookError>| async move {
                    Ok(Outcome::Continue(if err.is_some() { n + 50 } else { n }))
                }),
            )
            .await;
        registry.register("calc", Phase::Works, fail("broken")).await;
        registry.register("calc", Phase::Post, WorkItem::action("recover")).await;
        registry.register("calc", Phase::Post, add(1)).await;

        assert_eq!(exec.invoke("calc", 0).await.unwrap(), 51);
    }

    #[tokio::test]
    async fn test_nested_abort_is_scoped_to_nested_invocation() {
        let exec = executor();
        let registry = exec.registry();
        registry.register("inner", Phase::Works, add(5)).await;
        registry
            .register("inner", Phase::Post, WorkItem::job(|_n: u32| async move { Ok(Outcome::Abort) }))
            .await;
        registry.register("outer", Phase::Works, WorkItem::action("inner")).await;
        registry.register("outer", Phase::Post, add(1)).await;

        assert_eq!(exec.invoke("outer", 0).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_depth_is_visible_inside_jobs() {
        let exec = executor();
        let registry = exec.registry();
        registry
            .register(
                "measure",
                Phase::Works,
                WorkItem::job(|_n: u32| async move {
                    Ok(Outcome::Continue(current_depth() as u32))
                }),
            )
            .await;
        registry.register("outer", Phase::Works, WorkItem::action("measure")).await;

        assert_eq!(current_depth(), 0);
        assert_eq!(exec.invoke("measure", 0).await.unwrap(), 1);
        assert_eq!(exec.invoke("outer", 0).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_spawned_work_starts_at_depth_zero() {
        let exec = executor();
        exec.registry()
            .register(
                "measure",
                Phase::Works,
                WorkItem::job(|_n: u32| async move {
                    let inside = current_depth() as u32;
                    let spawned = tokio::spawn(async { current_depth() as u32 })
                        .await
                        .map_err(|e| HookError::internal(e.to_string()))?;
                    Ok(Outcome::Continue(inside * 10 + spawned))
                }),
            )
            .await;

        assert_eq!(exec.invoke("measure", 0).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_depth_guard_ignores_unregistered_actions() {
        let registry = Arc::new(TaskRegistry::new());
        let exec: Executor<u32, HookError> =
            Executor::new(registry.clone(), DispatchConfig::with_max_depth(0));
        registry.register("outer", Phase::Works, WorkItem::action("missing")).await;

        assert_eq!(exec.invoke("outer", 7).await.unwrap(), 7);

        let err = exec
            .invoke_with("outer", 7, Some(HookError::job("orig")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Job);
        assert_eq!(err.message, "orig");
    }

    #[tokio::test]
    async fn test_depth_guard_stops_self_reference() {
        let registry = Arc::new(TaskRegistry::new());
        let exec: Executor<u32, HookError> =
            Executor::new(registry.clone(), DispatchConfig::with_max_depth(3));
        registry.register("spin", Phase::Works, add(1)).await;
        registry.register("spin", Phase::Works, WorkItem::action("spin")).await;

        let err = exec.invoke("spin", 0).await.unwrap_err();
        assert!(err.is(ErrorKind::DepthExceeded));
    }
}
