//! Text tools: case conversion and word counting.

use async_trait::async_trait;
use convo_core::error::ToolError;
use convo_core::tool::{Tool, ToolResult};

pub struct UppercaseTool;

#[async_trait]
impl Tool for UppercaseTool {
    fn name(&self) -> &str {
        "to_uppercase"
    }

    fn description(&self) -> &str {
        "Convert text to uppercase"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Text to convert"}
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let text = arguments["text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'text' argument".into()))?;
        Ok(ToolResult::ok(text.to_uppercase()))
    }
}

pub struct CountWordsTool;

#[async_trait]
impl Tool for CountWordsTool {
    fn name(&self) -> &str {
        "count_words"
    }

    fn description(&self) -> &str {
        "Count the number of words in text"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Text to analyze"}
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let text = arguments["text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'text' argument".into()))?;
        let count = text.split_whitespace().count();
        Ok(ToolResult::ok(count.to_string()).with_data(serde_json::json!({"count": count})))
    }
}
