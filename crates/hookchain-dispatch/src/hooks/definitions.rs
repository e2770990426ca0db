//! Work item, job, and outcome definitions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use hookchain_core::error::HookError;

/// Name of a registered action.
pub type Action = String;

/// One of the three ordered sequences held by a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Runs before the main work.
    Pre,
    /// The main work registered through `hook`.
    Works,
    /// Runs after the main work.
    Post,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 3] = [Phase::Pre, Phase::Works, Phase::Post];

    /// Returns the string name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Works => "works",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a job asks the executor to do with the context after it succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<C> {
    /// Replace the context with this value and move on.
    Continue(C),
    /// Keep the context as it was before the job ran and move on.
    Unchanged,
    /// Stop the whole invocation, reverting the context to its value before
    /// the job ran and dropping any pending error.
    Abort,
}

impl<C> Outcome<C> {
    /// Shorthand for [`Outcome::Unchanged`].
    pub fn unchanged() -> Self {
        Self::Unchanged
    }

    /// Shorthand for [`Outcome::Abort`].
    pub fn abort() -> Self {
        Self::Abort
    }

    /// Returns whether this outcome aborts the invocation.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort)
    }
}

impl<C> From<C> for Outcome<C> {
    fn from(context: C) -> Self {
        Self::Continue(context)
    }
}

/// Result of running a job.
pub type JobResult<C, E = HookError> = Result<Outcome<C>, E>;

/// A job that only sees the context.
///
/// Plain jobs are skipped while an error is pending.
#[async_trait]
pub trait Job<C, E = HookError>: Send + Sync {
    /// Runs the job against the current context.
    async fn run(&self, context: C) -> JobResult<C, E>;
}

/// A job that sees the context and the pending error.
///
/// Error-aware jobs always run. Returning `Ok` clears the pending error;
/// returning `Err` replaces it, so rethrowing is `Err(error)`.
#[async_trait]
pub trait ErrorAwareJob<C, E = HookError>: Send + Sync {
    /// Runs the job against the current context and pending error.
    async fn run(&self, context: C, error: Option<E>) -> JobResult<C, E>;
}

type PlainFn<C, E> = Arc<dyn Fn(C) -> BoxFuture<'static, JobResult<C, E>> + Send + Sync>;

type ErrorAwareFn<C, E> =
    Arc<dyn Fn(C, Option<E>) -> BoxFuture<'static, JobResult<C, E>> + Send + Sync>;

/// A closure-based plain job.
pub struct FnJob<C, E> {
    handler: PlainFn<C, E>,
}

impl<C, E> FnJob<C, E> {
    /// Wraps an async closure.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = JobResult<C, E>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |context| handler(context).boxed()),
        }
    }
}

impl<C, E> fmt::Debug for FnJob<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnJob")
            .field("handler", &"<closure>")
            .finish()
    }
}

#[async_trait]
impl<C, E> Job<C, E> for FnJob<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    async fn run(&self, context: C) -> JobResult<C, E> {
        (self.handler)(context).await
    }
}

/// A closure-based error-aware job.
pub struct FnErrorAwareJob<C, E> {
    handler: ErrorAwareFn<C, E>,
}

impl<C, E> FnErrorAwareJob<C, E> {
    /// Wraps an async closure taking the context and the pending error.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(C, Option<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = JobResult<C, E>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |context, error| handler(context, error).boxed()),
        }
    }
}

impl<C, E> fmt::Debug for FnErrorAwareJob<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnErrorAwareJob")
            .field("handler", &"<closure>")
            .finish()
    }
}

#[async_trait]
impl<C, E> ErrorAwareJob<C, E> for FnErrorAwareJob<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    async fn run(&self, context: C, error: Option<E>) -> JobResult<C, E> {
        (self.handler)(context, error).await
    }
}

/// An entry in one of a task's phase sequences.
pub enum WorkItem<C, E = HookError> {
    /// Invoke another action with the current context and pending error.
    Action(Action),
    /// Run a plain job.
    Job(Arc<dyn Job<C, E>>),
    /// Run an error-aware job.
    ErrorAware(Arc<dyn ErrorAwareJob<C, E>>),
}

impl<C, E> WorkItem<C, E> {
    /// A reference to another action.
    pub fn action(name: impl Into<Action>) -> Self {
        Self::Action(name.into())
    }

    /// A plain job built from an async closure.
    pub fn job<F, Fut>(handler: F) -> Self
    where
        C: Send + 'static,
        E: Send + 'static,
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = JobResult<C, E>> + Send + 'static,
    {
        Self::Job(Arc::new(FnJob::new(handler)))
    }

    /// An error-aware job built from an async closure.
    pub fn error_aware<F, Fut>(handler: F) -> Self
    where
        C: Send + 'static,
        E: Send + 'static,
        F: Fn(C, Option<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = JobResult<C, E>> + Send + 'static,
    {
        Self::ErrorAware(Arc::new(FnErrorAwareJob::new(handler)))
    }

    /// Returns a short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Action(_) => "action",
            Self::Job(_) => "job",
            Self::ErrorAware(_) => "error_aware",
        }
    }

    /// Returns the referenced action name, if this item is an action reference.
    pub fn as_action(&self) -> Option<&str> {
        match self {
            Self::Action(name) => Some(name),
            _ => None,
        }
    }
}

impl<C, E> Clone for WorkItem<C, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Action(name) => Self::Action(name.clone()),
            Self::Job(job) => Self::Job(Arc::clone(job)),
            Self::ErrorAware(job) => Self::ErrorAware(Arc::clone(job)),
        }
    }
}

/// Action references compare by name, jobs by identity.
impl<C, E> PartialEq for WorkItem<C, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Action(a), Self::Action(b)) => a == b,
            (Self::Job(a), Self::Job(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Self::ErrorAware(a), Self::ErrorAware(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl<C, E> fmt::Debug for WorkItem<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(name) => f.debug_tuple("Action").field(name).finish(),
            Self::Job(job) => f.debug_tuple("Job").field(&Arc::as_ptr(job)).finish(),
            Self::ErrorAware(job) => f.debug_tuple("ErrorAware").field(&Arc::as_ptr(job)).finish(),
        }
    }
}

impl<C, E> From<&str> for WorkItem<C, E> {
    fn from(name: &str) -> Self {
        Self::action(name)
    }
}

impl<C, E> From<String> for WorkItem<C, E> {
    fn from(name: String) -> Self {
        Self::action(name)
    }
}
