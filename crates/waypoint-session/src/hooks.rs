//! Call-lifecycle hooks.
//!
//! Glue code (transport wiring, UIs, metrics) registers async handlers
//! for session events and gets called as the session moves through its
//! lifecycle. Hooks observe; they cannot veto or rewrite anything, and
//! a failing hook never takes the session down.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Points in the session lifecycle hooks can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted,
    FirstParticipantJoined,
    ParticipantLeft,
    BeforeToolCall,
    AfterToolCall,
    SessionEnded,
}

/// Context passed to every hook invocation.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

impl HookContext {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Async hook handler function type.
pub type HookHandler = Box<
    dyn Fn(HookContext, serde_json::Value) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>
        + Send
        + Sync,
>;

/// Registry of hook handlers, keyed by event.
pub struct HookRegistry {
    handlers: RwLock<HashMap<SessionEvent, Vec<HookHandler>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler for an event.
    pub async fn register(&self, event: SessionEvent, handler: HookHandler) {
        let mut handlers = self.handlers.write().await;
        handlers.entry(event).or_default().push(handler);
    }

    /// Fire all handlers for an event in registration order.
    ///
    /// Handler errors are logged and the chain continues.
    pub async fn fire(&self, event: SessionEvent, ctx: HookContext, data: serde_json::Value) {
        let handlers = self.handlers.read().await;
        let Some(chain) = handlers.get(&event) else {
            return;
        };

        for handler in chain {
            if let Err(e) = handler(ctx.clone(), data.clone()).await {
                tracing::warn!(event = ?event, error = %e, "Hook handler error, continuing");
            }
        }
    }

    /// Number of handlers registered for an event.
    pub async fn count(&self, event: SessionEvent) -> usize {
        let handlers = self.handlers.read().await;
        handlers.get(&event).map_or(0, |v| v.len())
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
