//! The handler trait tool implementations plug into.

use async_trait::async_trait;

use waypoint_core::types::{ParameterSchema, ToolDeclaration};

/// The core handler trait. Every built-in and external tool implements this.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name as advertised to the model (e.g., "get_my_current_location").
    fn name(&self) -> &str;

    /// Human-readable description for the model.
    fn description(&self) -> &str;

    /// Named-field parameter shape, or `None` for tools without arguments.
    fn parameters_schema(&self) -> Option<ParameterSchema> {
        None
    }

    /// Perform the tool's work.
    ///
    /// Errors are contained at the dispatch boundary and come back to the
    /// conversation as failure payloads; handlers should return `Err` for
    /// anything the model ought to hear about (missing arguments, a
    /// downstream call failing) rather than panic.
    async fn call(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value>;
}

/// Build the declaration a handler would advertise for itself.
pub fn declaration_for(handler: &dyn ToolHandler) -> ToolDeclaration {
    let mut decl = ToolDeclaration::new(handler.name(), handler.description());
    if let Some(schema) = handler.parameters_schema() {
        decl = decl.with_parameters(schema);
    }
    decl
}
