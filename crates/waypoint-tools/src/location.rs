//! User location tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use waypoint_dispatch::ToolHandler;

/// A position as the model sees it. Coordinates travel as strings on
/// the wire, matching what voice clients send back for map lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub lat: String,
    pub lon: String,
}

/// Where the companion gets the user's position from.
///
/// The server process usually has no GPS; a client app can wire in a
/// live source, and tests or demos use [`FixedLocation`].
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> anyhow::Result<Position>;
}

/// Static location source.
pub struct FixedLocation {
    position: Position,
}

impl FixedLocation {
    pub fn new(lat: &str, lon: &str) -> Self {
        Self {
            position: Position {
                lat: lat.to_string(),
                lon: lon.to_string(),
            },
        }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> anyhow::Result<Position> {
        Ok(self.position.clone())
    }
}

/// `get_my_current_location` — hands the model the user's coordinates
/// so it can talk about the neighborhood instead of numbers.
pub struct CurrentLocationTool {
    source: Arc<dyn LocationSource>,
}

impl CurrentLocationTool {
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ToolHandler for CurrentLocationTool {
    fn name(&self) -> &str {
        "get_my_current_location"
    }

    fn description(&self) -> &str {
        "Retrieves the user's current location as lat/lon coordinates."
    }

    async fn call(&self, _args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        tracing::debug!("Fetching current location");
        let position = self
            .source
            .current_position()
            .await
            .map_err(|e| e.context("failed to get current location"))?;
        Ok(serde_json::to_value(position)?)
    }
}
