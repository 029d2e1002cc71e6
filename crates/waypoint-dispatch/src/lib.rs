//! Tool dispatch registry.
//!
//! A session advertises a fixed set of [`ToolDeclaration`]s to the model
//! and binds each name to a [`ToolHandler`] before the call starts. Once
//! built, the registry is read-only: dispatching resolves a request to
//! its handler and produces a [`ToolCallResult`], converting unknown
//! names and handler failures into structured failure payloads instead
//! of crashing the session.
//!
//! [`ToolDeclaration`]: waypoint_core::types::ToolDeclaration
//! [`ToolCallResult`]: waypoint_core::types::ToolCallResult

pub mod handler;
pub mod pending;
pub mod registry;

pub use handler::{ToolHandler, declaration_for};
pub use pending::PendingCall;
pub use registry::{DispatchRegistry, RegistryBuilder};
