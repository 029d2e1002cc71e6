//! Session bootstrap and runtime glue.
//!
//! A session is one continuous conversation between a user and the
//! voice agent, bounded by connect/disconnect. This crate assembles the
//! tool declarations and dispatch registry before the session starts,
//! fires lifecycle hooks, and drives tool-call traffic between the
//! agent runtime and the registry while the session is live.

pub mod bootstrap;
pub mod hooks;
pub mod runtime;

pub use bootstrap::{SessionSetup, bootstrap_session};
pub use hooks::{HookContext, HookHandler, HookRegistry, SessionEvent};
pub use runtime::{RunStats, SessionRuntime};
