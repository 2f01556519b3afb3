//! Clock tool: reports the current local date and time.

use async_trait::async_trait;
use chrono::Local;
use convo_core::error::ToolError;
use convo_core::tool::{Tool, ToolResult};

pub struct CurrentDateTimeTool;

#[async_trait]
impl Tool for CurrentDateTimeTool {
    fn name(&self) -> &str {
        "get_current_datetime"
    }

    fn description(&self) -> &str {
        "Get the current date and time"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let now = Local::now();
        Ok(ToolResult::ok(now.format("%Y-%m-%d %H:%M:%S").to_string()))
    }
}
