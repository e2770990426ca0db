//! Hook system: task registry, executor, and work item definitions.

pub mod definitions;
pub mod executor;
pub mod registry;

pub use definitions::{Action, ErrorAwareJob, Job, JobResult, Outcome, Phase, WorkItem};
pub use executor::{Executor, current_depth};
pub use registry::{Task, TaskRegistry};
