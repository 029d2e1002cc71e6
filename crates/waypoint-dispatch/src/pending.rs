//! In-flight tool calls.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use waypoint_core::types::{CallId, ToolCallResult};

/// A dispatched tool call whose result has not arrived yet.
///
/// Awaiting it yields the [`ToolCallResult`]; dropping it discards the
/// result (the handler keeps running to completion on the runtime, its
/// output simply goes nowhere). If the handler task dies without
/// reporting — it panicked, or the runtime shut down mid-call — awaiting
/// resolves to a failure result instead of an error.
pub struct PendingCall {
    pub(crate) call_id: CallId,
    pub(crate) tool: String,
    pub(crate) rx: oneshot::Receiver<ToolCallResult>,
}

impl PendingCall {
    /// Call id of the originating request.
    pub fn call_id(&self) -> &CallId {
        &self.call_id
    }

    /// Tool name of the originating request.
    pub fn tool(&self) -> &str {
        &self.tool
    }
}

impl Future for PendingCall {
    type Output = ToolCallResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(ToolCallResult::failure(
                self.call_id.clone(),
                &self.tool,
                "handler task ended without producing a result",
            )),
            Poll::Pending => Poll::Pending,
        }
    }
}
