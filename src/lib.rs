//! Dispatch `tracing` events to a fluentd collector.
//!
//! Each event at a subscribed level becomes an [`entry::Entry`] that a
//! [`hook::Hook`] enriches (level, message, caller), routes by tag and posts
//! through a [`transport::Transport`], synchronously on the logging thread.

pub mod severity;
pub mod entry;
pub mod normalize;
pub mod tag;
pub mod caller;
pub mod transport;
pub mod hook;
pub mod layer;
pub mod panic;

#[cfg(feature = "forward")]
pub mod forward;

#[cfg(feature = "forward")]
pub mod init;

pub mod env;
pub mod noop;

pub use entry::{CallSite, Entry, Fields};
pub use hook::{FluentHook, Hook, HookError};
pub use layer::HookLayer;
pub use severity::Severity;
