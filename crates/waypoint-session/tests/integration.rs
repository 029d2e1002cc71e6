//! End-to-end tests: bootstrap a session from config, run the tool-call
//! loop, and drive it the way an agent runtime would.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use waypoint_core::config::Config;
use waypoint_core::types::{ToolCallRequest, ToolDeclaration};
use waypoint_dispatch::{RegistryBuilder, ToolHandler};
use waypoint_session::{HookRegistry, SessionEvent, SessionRuntime, bootstrap_session};

#[tokio::test]
async fn current_location_round_trip() {
    let setup = bootstrap_session(&Config::default()).unwrap();

    let request = ToolCallRequest::new("get_my_current_location", json!({}));
    let call_id = request.call_id.clone();
    let result = setup.registry.dispatch_and_wait(request).await;

    assert_eq!(result.call_id, call_id);
    assert_eq!(
        result.payload(),
        Some(&json!({"lat": "-27.501586", "lon": "-48.489710"}))
    );
}

#[tokio::test]
async fn restaurant_with_missing_argument_fails_gracefully() {
    let setup = bootstrap_session(&Config::default()).unwrap();

    let result = setup
        .registry
        .dispatch_and_wait(ToolCallRequest::new(
            "set_restaurant_location",
            json!({"restaurant": "Ostradamus", "lat": "-27.78"}),
        ))
        .await;

    assert!(result.is_error());
    assert!(result.error_message().unwrap().contains("lon"));
    assert!(setup.selection.read().await.is_none());
}

#[tokio::test]
async fn restaurant_selection_is_visible_after_the_call() {
    let setup = bootstrap_session(&Config::default()).unwrap();

    let result = setup
        .registry
        .dispatch_and_wait(ToolCallRequest::new(
            "set_restaurant_location",
            json!({"restaurant": "Ostradamus", "lat": "-27.7817", "lon": "-48.5650"}),
        ))
        .await;

    assert!(!result.is_error());
    let selection = setup.selection.read().await.clone().unwrap();
    assert_eq!(selection.restaurant, "Ostradamus");
}

#[tokio::test]
async fn unknown_tool_is_reported_not_thrown() {
    let setup = bootstrap_session(&Config::default()).unwrap();

    let result = setup
        .registry
        .dispatch_and_wait(ToolCallRequest::new("book_flight", json!({})))
        .await;

    assert!(result.is_error());
    assert!(result.error_message().unwrap().contains("unknown tool"));
}

#[tokio::test]
async fn runtime_dispatches_concurrently_and_correlates_results() {
    let setup = bootstrap_session(&Config::default()).unwrap();
    let hooks = Arc::new(HookRegistry::new());
    let runtime = SessionRuntime::new(&setup.session_id, setup.registry.clone(), hooks);

    let (request_tx, request_rx) = mpsc::channel(8);
    let (result_tx, mut result_rx) = mpsc::channel(8);

    let run = tokio::spawn(async move { runtime.run(request_rx, result_tx).await });

    let req_location = ToolCallRequest::new("get_my_current_location", json!({}));
    let req_date = ToolCallRequest::new("get_current_date", json!({}));
    let (id_location, id_date) = (req_location.call_id.clone(), req_date.call_id.clone());

    request_tx.send(req_location).await.unwrap();
    request_tx.send(req_date).await.unwrap();

    let first = result_rx.recv().await.unwrap();
    let second = result_rx.recv().await.unwrap();

    // Order is not guaranteed; correlate by call id.
    for result in [&first, &second] {
        assert!(!result.is_error());
        if result.call_id == id_location {
            assert_eq!(result.tool, "get_my_current_location");
        } else {
            assert_eq!(result.call_id, id_date);
            assert_eq!(result.tool, "get_current_date");
        }
    }
    assert_ne!(first.call_id, second.call_id);

    drop(request_tx);
    let stats = run.await.unwrap();
    assert_eq!(stats.dispatched, 2);
}

struct StalledTool;

#[async_trait]
impl ToolHandler for StalledTool {
    fn name(&self) -> &str {
        "stalled"
    }

    fn description(&self) -> &str {
        "never finishes in time"
    }

    async fn call(&self, _args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(json!("too late"))
    }
}

#[tokio::test]
async fn cancellation_discards_pending_results() {
    let mut builder =
        RegistryBuilder::new(vec![ToolDeclaration::new("stalled", "test tool")]).unwrap();
    builder.register(Arc::new(StalledTool)).unwrap();
    let registry = builder.build();

    let hooks = Arc::new(HookRegistry::new());
    let runtime = SessionRuntime::new("cancel-test", registry, hooks);
    let cancel = runtime.cancellation_token();

    let (request_tx, request_rx) = mpsc::channel(8);
    let (result_tx, mut result_rx) = mpsc::channel(8);

    let run = tokio::spawn(async move { runtime.run(request_rx, result_tx).await });

    request_tx
        .send(ToolCallRequest::new("stalled", json!({})))
        .await
        .unwrap();

    // Let the dispatch land, then end the session under it.
    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    let stats = run.await.unwrap();
    assert_eq!(stats.dispatched, 1);

    // No result is ever delivered for the discarded call.
    let outcome =
        tokio::time::timeout(Duration::from_millis(50), result_rx.recv()).await;
    assert!(matches!(outcome, Ok(None) | Err(_)));
}

#[tokio::test]
async fn lifecycle_hooks_fire_around_tool_calls() {
    let setup = bootstrap_session(&Config::default()).unwrap();
    let hooks = Arc::new(HookRegistry::new());

    let seen = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    for event in [
        SessionEvent::SessionStarted,
        SessionEvent::BeforeToolCall,
        SessionEvent::AfterToolCall,
        SessionEvent::SessionEnded,
    ] {
        let seen = seen.clone();
        hooks
            .register(
                event,
                Box::new(move |_ctx, _data| {
                    let seen = seen.clone();
                    Box::pin(async move {
                        seen.lock().await.push(event);
                        Ok(())
                    })
                }),
            )
            .await;
    }

    let runtime = SessionRuntime::new(&setup.session_id, setup.registry.clone(), hooks);

    let (request_tx, request_rx) = mpsc::channel(8);
    let (result_tx, mut result_rx) = mpsc::channel(8);
    let run = tokio::spawn(async move { runtime.run(request_rx, result_tx).await });

    request_tx
        .send(ToolCallRequest::new("get_current_date", json!({})))
        .await
        .unwrap();
    let result = result_rx.recv().await.unwrap();
    assert!(!result.is_error());

    drop(request_tx);
    run.await.unwrap();

    let seen = seen.lock().await.clone();
    assert_eq!(seen[0], SessionEvent::SessionStarted);
    assert!(seen.contains(&SessionEvent::BeforeToolCall));
    assert!(seen.contains(&SessionEvent::AfterToolCall));
    assert_eq!(*seen.last().unwrap(), SessionEvent::SessionEnded);
}
