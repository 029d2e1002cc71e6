//! Session tool-call loop.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use waypoint_core::types::{ToolCallRequest, ToolCallResult};
use waypoint_dispatch::DispatchRegistry;

use crate::hooks::{HookContext, HookRegistry, SessionEvent};

/// Counters from one session run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub dispatched: u64,
}

/// Drives tool-call traffic for one live session.
///
/// Requests stream in from the agent runtime over a channel; each one is
/// dispatched without blocking the intake loop, and its result goes back
/// over the result channel whenever the handler finishes. Cancelling the
/// session stops intake and discards in-flight results.
pub struct SessionRuntime {
    session_id: String,
    registry: DispatchRegistry,
    hooks: Arc<HookRegistry>,
    cancel: CancellationToken,
}

impl SessionRuntime {
    pub fn new(session_id: &str, registry: DispatchRegistry, hooks: Arc<HookRegistry>) -> Self {
        Self {
            session_id: session_id.to_string(),
            registry,
            hooks,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that ends the session when cancelled (participant left,
    /// transport dropped).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn ctx(&self) -> HookContext {
        HookContext::new(&self.session_id)
    }

    /// Run until the request stream closes or the session is cancelled.
    pub async fn run(
        &self,
        mut requests: mpsc::Receiver<ToolCallRequest>,
        results: mpsc::Sender<ToolCallResult>,
    ) -> RunStats {
        let mut stats = RunStats::default();

        self.hooks
            .fire(SessionEvent::SessionStarted, self.ctx(), json!({}))
            .await;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(session = %self.session_id, "Session cancelled, stopping intake");
                    break;
                }
                maybe_request = requests.recv() => {
                    let Some(request) = maybe_request else {
                        debug!(session = %self.session_id, "Request stream closed");
                        break;
                    };
                    stats.dispatched += 1;

                    self.hooks
                        .fire(
                            SessionEvent::BeforeToolCall,
                            self.ctx(),
                            json!({
                                "tool": request.tool.clone(),
                                "call_id": request.call_id.clone(),
                            }),
                        )
                        .await;

                    let pending = self.registry.dispatch(request);

                    let results = results.clone();
                    let hooks = self.hooks.clone();
                    let cancel = self.cancel.clone();
                    let session_id = self.session_id.clone();
                    let tool = pending.tool().to_string();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                debug!(
                                    session = %session_id,
                                    tool = %tool,
                                    "Session ended, discarding pending tool result"
                                );
                            }
                            result = pending => {
                                hooks
                                    .fire(
                                        SessionEvent::AfterToolCall,
                                        HookContext::new(&session_id),
                                        json!({
                                            "tool": result.tool.clone(),
                                            "call_id": result.call_id.clone(),
                                            "is_error": result.is_error(),
                                        }),
                                    )
                                    .await;
                                if results.send(result).await.is_err() {
                                    debug!(session = %session_id, "Result channel closed, discarding");
                                }
                            }
                        }
                    });
                }
            }
        }

        self.hooks
            .fire(
                SessionEvent::SessionEnded,
                self.ctx(),
                json!({ "dispatched": stats.dispatched }),
            )
            .await;

        stats
    }
}
