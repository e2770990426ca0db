//! # hookchain
//!
//! Register ordered, asynchronous jobs against named actions, grouped into
//! pre/main/post phases, and invoke them by name while threading a context
//! and an optional pending error through the chain.
//!
//! ```
//! use hookchain::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> HookResult<()> {
//!     let store: HookStore<u32> = HookStore::new();
//!     store.pre("greet", WorkItem::job(|n: u32| async move { Ok(Outcome::Continue(n + 1)) })).await;
//!     store.hook("greet", WorkItem::action("audit")).await;
//!     assert_eq!(store.invoke("greet", 0).await?, 1);
//!     Ok(())
//! }
//! ```

pub use hookchain_core;
pub use hookchain_dispatch;

pub use hookchain_core::{ErrorKind, HookConfig, HookError, HookResult};
pub use hookchain_dispatch::{HookStore, Outcome, WeakHookStore, WorkItem};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookchain_core::config::HookConfig;
    pub use hookchain_dispatch::prelude::*;
}
