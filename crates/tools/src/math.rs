//! Arithmetic tools: addition, multiplication, and exponentiation.

use async_trait::async_trait;
use convo_core::error::ToolError;
use convo_core::tool::{Tool, ToolResult};

pub struct AddNumbersTool;

#[async_trait]
impl Tool for AddNumbersTool {
    fn name(&self) -> &str {
        "add_numbers"
    }

    fn description(&self) -> &str {
        "Add two numbers together"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "a": {"type": "number", "description": "First number"},
                "b": {"type": "number", "description": "Second number"}
            },
            "required": ["a", "b"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let a = require_number(&arguments, "a")?;
        let b = require_number(&arguments, "b")?;
        let value = a + b;
        Ok(ToolResult::ok(format_number(value)).with_data(serde_json::json!({"result": value})))
    }
}

pub struct MultiplyNumbersTool;

#[async_trait]
impl Tool for MultiplyNumbersTool {
    fn name(&self) -> &str {
        "multiply_numbers"
    }

    fn description(&self) -> &str {
        "Multiply two numbers"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "a": {"type": "number", "description": "First number"},
                "b": {"type": "number", "description": "Second number"}
            },
            "required": ["a", "b"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let a = require_number(&arguments, "a")?;
        let b = require_number(&arguments, "b")?;
        let value = a * b;
        Ok(ToolResult::ok(format_number(value)).with_data(serde_json::json!({"result": value})))
    }
}

pub struct PowerTool;

#[async_trait]
impl Tool for PowerTool {
    fn name(&self) -> &str {
        "power"
    }

    fn description(&self) -> &str {
        "Calculate the power of a number"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "base": {"type": "number", "description": "Base number"},
                "exponent": {"type": "number", "description": "Exponent"}
            },
            "required": ["base", "exponent"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let base = require_number(&arguments, "base")?;
        let exponent = require_number(&arguments, "exponent")?;
        let value = base.powf(exponent);
        Ok(ToolResult::ok(format_number(value)).with_data(serde_json::json!({"result": value})))
    }
}

fn require_number(arguments: &serde_json::Value, key: &str) -> Result<f64, ToolError> {
    arguments[key]
        .as_f64()
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{key}' argument")))
}

/// Format nicely: remove trailing .0 for integers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
