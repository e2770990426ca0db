//! Error types for hookchain.
//!
//! [`HookError`] is the default failure value carried through a chain. Stores
//! parameterised over a caller-defined error type still raise their own
//! failures as a `HookError` and convert them with `From`.

use std::fmt;
use thiserror::Error;

/// Category of a [`HookError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A job or action reported a failure.
    Job,
    /// An invocation nested deeper than the configured maximum.
    DepthExceeded,
    /// Configuration could not be loaded or applied.
    Configuration,
    /// An internal invariant was violated.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job => write!(f, "JOB"),
            Self::DepthExceeded => write!(f, "DEPTH_EXCEEDED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The error value threaded through hook chains by default.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct HookError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HookError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a job failure.
    pub fn job(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Job, message)
    }

    /// Create a depth-exceeded error for `action` invoked at `depth`.
    pub fn depth_exceeded(action: &str, depth: usize, max_depth: usize) -> Self {
        Self::new(
            ErrorKind::DepthExceeded,
            format!("action '{action}' invoked at depth {depth}, maximum is {max_depth}"),
        )
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for HookError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for HookError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, "failed to load configuration", err)
    }
}
