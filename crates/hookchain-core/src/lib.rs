//! # hookchain-core
//!
//! Shared foundation for hookchain: the default error type, configuration
//! schemas and loader, and tracing subscriber setup.
//!
//! This crate has **no** internal dependencies on other hookchain crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use config::HookConfig;
pub use error::{ErrorKind, HookError};
pub use result::HookResult;
