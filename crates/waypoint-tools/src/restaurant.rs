//! Restaurant selection tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use waypoint_core::types::{ParameterSchema, ParameterType};
use waypoint_dispatch::ToolHandler;

/// A restaurant the user settled on during the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSelection {
    pub restaurant: String,
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
}

/// Shared slot the surrounding app reads after the call (e.g. to open
/// a map view). At most one selection is kept; a later call replaces it.
pub type SelectionSlot = Arc<RwLock<Option<RestaurantSelection>>>;

pub fn selection_slot() -> SelectionSlot {
    Arc::new(RwLock::new(None))
}

/// `set_restaurant_location` — records the restaurant the model and the
/// user agreed on.
pub struct SetRestaurantLocationTool {
    slot: SelectionSlot,
}

impl SetRestaurantLocationTool {
    pub fn new(slot: SelectionSlot) -> Self {
        Self { slot }
    }
}

fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> anyhow::Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("missing '{key}' argument"))
}

fn parse_coordinate(raw: &str, key: &str) -> anyhow::Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| anyhow::anyhow!("'{key}' is not a valid coordinate: {raw}"))
}

#[async_trait]
impl ToolHandler for SetRestaurantLocationTool {
    fn name(&self) -> &str {
        "set_restaurant_location"
    }

    fn description(&self) -> &str {
        "Records the restaurant the user chose, with its coordinates, so the app can show it on a map."
    }

    fn parameters_schema(&self) -> Option<ParameterSchema> {
        Some(
            ParameterSchema::new()
                .field("restaurant", ParameterType::String, "Restaurant name", true)
                .field("lat", ParameterType::String, "Latitude as a decimal string", true)
                .field("lon", ParameterType::String, "Longitude as a decimal string", true)
                .field("address", ParameterType::String, "Full street address", false),
        )
    }

    async fn call(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let restaurant = required_str(&args, "restaurant")?.to_string();
        let lat = parse_coordinate(required_str(&args, "lat")?, "lat")?;
        let lon = parse_coordinate(required_str(&args, "lon")?, "lon")?;
        let address = args
            .get("address")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        tracing::info!(%restaurant, lat, lon, "Restaurant selected");

        let mut slot = self.slot.write().await;
        *slot = Some(RestaurantSelection {
            restaurant,
            lat,
            lon,
            address,
        });

        Ok(serde_json::json!("success"))
    }
}
