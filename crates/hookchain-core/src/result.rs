//! Convenience result type alias for hookchain.

use crate::error::HookError;

/// A specialized `Result` type for operations failing with [`HookError`].
pub type HookResult<T> = Result<T, HookError>;
