//! Session bootstrap — assemble the tool surface before the call starts.

use std::sync::Arc;

use waypoint_core::config::Config;
use waypoint_core::error::{Result, WaypointError};
use waypoint_core::types::ToolDeclaration;
use waypoint_dispatch::{DispatchRegistry, RegistryBuilder, ToolHandler, declaration_for};
use waypoint_tools::{
    CurrentDateTool, CurrentLocationTool, FixedLocation, SelectionSlot, SetRestaurantLocationTool,
    selection_slot,
};

/// Everything the surrounding app needs out of bootstrap.
#[derive(Debug)]
pub struct SessionSetup {
    pub session_id: String,
    /// Declarations to advertise to the model, built-ins first.
    pub declarations: Vec<ToolDeclaration>,
    pub registry: DispatchRegistry,
    /// Slot the restaurant tool writes into; read it after the call.
    pub selection: SelectionSlot,
}

/// Build the tool surface for a session from config.
///
/// Built-in handlers are declared and registered together, so the
/// registry invariant (declared names match registered names) holds by
/// construction. Extra declarations from config have no local handler;
/// those fail bootstrap unless the config opts into external handling.
pub fn bootstrap_session(config: &Config) -> Result<SessionSetup> {
    let selection = selection_slot();

    let (lat, lon) = config.default_location();
    let builtins: Vec<Arc<dyn ToolHandler>> = vec![
        Arc::new(CurrentLocationTool::new(Arc::new(FixedLocation::new(
            &lat, &lon,
        )))),
        Arc::new(SetRestaurantLocationTool::new(selection.clone())),
        Arc::new(CurrentDateTool),
    ];

    let enabled: Vec<Arc<dyn ToolHandler>> = builtins
        .into_iter()
        .filter(|h| config.tool_enabled(h.name()))
        .collect();

    let mut declarations: Vec<ToolDeclaration> = enabled
        .iter()
        .map(|h| declaration_for(h.as_ref()))
        .collect();
    declarations.extend(config.extra_declarations().iter().cloned());

    let mut builder = RegistryBuilder::new(declarations.clone())?;
    for handler in enabled {
        builder.register(handler)?;
    }

    let missing = builder.missing_handlers();
    if !missing.is_empty() && !config.allow_unhandled_tools() {
        return Err(WaypointError::Config(format!(
            "declared tools without handlers: {}",
            missing.join(", ")
        )));
    }

    let registry = builder.build();
    tracing::info!(tools = ?registry.tool_names(), "Session tool surface ready");

    Ok(SessionSetup {
        session_id: uuid::Uuid::new_v4().to_string(),
        declarations,
        registry,
        selection,
    })
}
