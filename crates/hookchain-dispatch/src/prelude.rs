//! Common imports for registering and invoking hooks.

pub use crate::hooks::definitions::{ErrorAwareJob, Job, JobResult, Outcome, Phase, WorkItem};
pub use crate::hooks::executor::current_depth;
pub use crate::store::{HookStore, WeakHookStore};
pub use hookchain_core::error::{ErrorKind, HookError};
pub use hookchain_core::result::HookResult;
