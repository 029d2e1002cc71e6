//! Current date tool.

use async_trait::async_trait;
use chrono::Local;

use waypoint_dispatch::ToolHandler;

/// `get_current_date` — lets the model mention what day it is when
/// greeting the user, without guessing from stale training data.
pub struct CurrentDateTool;

#[async_trait]
impl ToolHandler for CurrentDateTool {
    fn name(&self) -> &str {
        "get_current_date"
    }

    fn description(&self) -> &str {
        "Returns today's date and weekday in the server's local timezone."
    }

    async fn call(&self, _args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let now = Local::now();
        Ok(serde_json::json!({
            "date": now.format("%Y-%m-%d").to_string(),
            "weekday": now.format("%A").to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_payload_shape() {
        let payload = CurrentDateTool.call(json!({})).await.unwrap();
        let date = payload["date"].as_str().unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert!(!payload["weekday"].as_str().unwrap().is_empty());
    }
}
