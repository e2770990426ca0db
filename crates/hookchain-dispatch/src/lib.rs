//! # hookchain-dispatch
//!
//! Named-action hook dispatcher. Provides:
//!
//! - A task registry mapping action names to append-only pre/works/post sequences
//! - Plain and error-aware jobs, plus references to other actions
//! - An executor with Continue/Unchanged/Abort semantics and error propagation
//! - [`HookStore`], an isolated registry/executor pair

pub mod hooks;
pub mod prelude;
pub mod store;

pub use hooks::definitions::{Action, ErrorAwareJob, Job, JobResult, Outcome, Phase, WorkItem};
pub use hooks::executor::{Executor, current_depth};
pub use hooks::registry::{Task, TaskRegistry};
pub use store::{HookStore, WeakHookStore};
