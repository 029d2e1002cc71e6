//! Registry construction and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use waypoint_core::error::{Result, WaypointError};
use waypoint_core::types::{ToolCallRequest, ToolCallResult, ToolDeclaration};

use crate::handler::ToolHandler;
use crate::pending::PendingCall;

/// Builds a [`DispatchRegistry`] for one session.
///
/// Construction is the only place configuration errors can surface:
/// registering a handler for an undeclared name, or binding a name
/// twice, fails here and must stop session bootstrap. Everything after
/// `build()` is contained per call.
pub struct RegistryBuilder {
    declarations: Vec<ToolDeclaration>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl RegistryBuilder {
    /// Start from the declarations the session will advertise to the model.
    ///
    /// Fails if two declarations share a name.
    pub fn new(declarations: Vec<ToolDeclaration>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for decl in &declarations {
            if !seen.insert(decl.name.as_str()) {
                return Err(WaypointError::Config(format!(
                    "duplicate tool declaration '{}'",
                    decl.name
                )));
            }
        }
        Ok(Self {
            declarations,
            handlers: HashMap::new(),
        })
    }

    /// Bind a handler under its self-reported name.
    ///
    /// Fails if the name is not among the declarations or is already
    /// bound; a failed registration leaves the builder unchanged.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<()> {
        let name = handler.name().to_string();

        if !self.declarations.iter().any(|d| d.name == name) {
            return Err(WaypointError::Config(format!(
                "handler '{name}' has no matching tool declaration"
            )));
        }
        if self.handlers.contains_key(&name) {
            return Err(WaypointError::Config(format!(
                "handler already registered for tool '{name}'"
            )));
        }

        debug!(tool = %name, "Registered tool handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Declared tool names with no handler bound yet.
    ///
    /// Bootstrap code decides whether these are fatal; a tool may be
    /// legitimately handled outside this process (e.g. on the client).
    pub fn missing_handlers(&self) -> Vec<&str> {
        self.declarations
            .iter()
            .filter(|d| !self.handlers.contains_key(&d.name))
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Seal into an immutable registry.
    pub fn build(self) -> DispatchRegistry {
        let missing = self.missing_handlers();
        if !missing.is_empty() {
            warn!(
                tools = %missing.join(", "),
                "Declared tools without local handlers; dispatching them will fail as unknown"
            );
        }
        DispatchRegistry {
            declarations: Arc::new(self.declarations),
            handlers: Arc::new(self.handlers),
        }
    }
}

/// Read-only name → handler mapping for one session.
///
/// Cloning is cheap; clones share the same underlying maps. Safe for
/// concurrent dispatch of distinct call ids — there is no mutable state
/// beyond what individual handlers carry themselves.
#[derive(Clone)]
pub struct DispatchRegistry {
    declarations: Arc<Vec<ToolDeclaration>>,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl DispatchRegistry {
    /// Declarations to advertise to the model, in declaration order.
    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    /// Registered tool names, sorted, for bootstrap diagnostics.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a request to its handler and start it.
    ///
    /// Fire-and-continue: the handler runs on a spawned task so the rest
    /// of the conversation pipeline keeps flowing; the returned
    /// [`PendingCall`] resolves to the result. An unknown tool name
    /// resolves immediately to a failure result. The call id is carried
    /// through untouched.
    pub fn dispatch(&self, request: ToolCallRequest) -> PendingCall {
        let ToolCallRequest {
            call_id,
            tool,
            arguments,
        } = request;
        let (tx, rx) = oneshot::channel();

        match self.handlers.get(&tool) {
            None => {
                warn!(tool = %tool, call_id = %call_id, "Unknown tool requested");
                let _ = tx.send(ToolCallResult::failure(
                    call_id.clone(),
                    &tool,
                    format!("unknown tool: {tool}"),
                ));
            }
            Some(handler) => {
                debug!(tool = %tool, call_id = %call_id, "Dispatching tool call");
                let handler = handler.clone();
                let task_call_id = call_id.clone();
                let task_tool = tool.clone();
                tokio::spawn(async move {
                    let result = match handler.call(arguments).await {
                        Ok(payload) => {
                            ToolCallResult::success(task_call_id, &task_tool, payload)
                        }
                        Err(e) => {
                            warn!(tool = %task_tool, error = %e, "Tool handler failed");
                            // {:#} includes the error's source chain
                            ToolCallResult::failure(task_call_id, &task_tool, format!("{e:#}"))
                        }
                    };
                    // Receiver may be gone if the session ended; the
                    // result is simply discarded.
                    let _ = tx.send(result);
                });
            }
        }

        PendingCall { call_id, tool, rx }
    }

    /// Dispatch and await the result in place.
    pub async fn dispatch_and_wait(&self, request: ToolCallRequest) -> ToolCallResult {
        self.dispatch(request).await
    }

    /// Whether a handler is bound for `name`.
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl std::fmt::Debug for DispatchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("declared", &self.declarations.len())
            .field("registered", &self.handlers.len())
            .finish()
    }
}
