//! Tool trait and registry — the capabilities the model may invoke.
//!
//! Each tool bundles its name, description, parameter schema, and body behind
//! the [`Tool`] trait. The [`ToolRegistry`] owns the registered set, hands out
//! wire-ready definitions, and dispatches calls by name. Registration order is
//! preserved so the schemas the model sees are stable across requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A request to execute a tool, with arguments already parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation ID (matches the model's tool_call id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// A successful result. The registry fills in `call_id` on dispatch.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: true,
            output: output.into(),
            data: None,
        }
    }

    /// A failed result whose output is the error text shown to the model.
    pub fn error(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: false,
            output: output.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The core Tool trait.
///
/// Implementations live in `convo-tools`; the chat loop only sees the trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "add_numbers").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters. Every listed parameter
    /// is required.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools, in registration order.
///
/// Registering a name twice replaces the earlier tool in place, silently —
/// last registration wins, the slot keeps its original position.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        debug!(tool = %name, "registered tool");
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// Wire-ready definitions for every registered tool, in registration
    /// order. Freshly built on each call; mutating the returned list never
    /// touches the registry.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// A JSON document teaching the model the `{tool_name, arguments}`
    /// envelope plus every tool's name, description, and arguments schema.
    /// `None` when no tools are registered.
    pub fn instruction_text(&self) -> Option<String> {
        if self.tools.is_empty() {
            return None;
        }

        let tools: Vec<serde_json::Value> = self
            .tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "arguments_schema": t.parameters_schema(),
                })
            })
            .collect();

        let instruction = serde_json::json!({
            "tool_call_format": {
                "type": "object",
                "properties": {
                    "tool_name": {
                        "type": "string",
                        "description": "One of the tool names listed in tools[].name"
                    },
                    "arguments": {
                        "type": "object",
                        "description": "JSON object that matches the selected tool's arguments_schema"
                    }
                },
                "required": ["tool_name", "arguments"]
            },
            "tools": tools,
        });

        serde_json::to_string_pretty(&instruction).ok()
    }

    /// Execute a tool call. `NotFound` if the name isn't registered. A tool
    /// that fails internally still produces a textual result, prefixed
    /// `Error executing tool {name}:`, so the model sees the failure as data.
    /// The result carries the call's correlation id.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        let mut result = match tool.execute(call.arguments.clone()).await {
            Ok(r) => r,
            Err(e) => ToolResult::error(format!("Error executing tool {}: {e}", call.name)),
        };
        result.call_id = call.id.clone();
        Ok(result)
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A trivial test tool.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Text to echo" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(ToolResult::ok(text))
        }
    }

    /// Same name as EchoTool, different behavior, for collision tests.
    struct ShoutingEchoTool;

    #[async_trait]
    impl Tool for ShoutingEchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input, loudly"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Text to echo" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_uppercase();
            Ok(ToolResult::ok(text))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn last_registration_wins_silently() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(ShoutingEchoTool));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().description(), "Echoes back the input, loudly");
    }

    #[test]
    fn definitions_are_a_defensive_copy() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let mut defs = registry.definitions();
        defs[0].name = "tampered".into();
        defs.clear();

        let defs_again = registry.definitions();
        assert_eq!(defs_again.len(), 1);
        assert_eq!(defs_again[0].name, "echo");
    }

    #[test]
    fn instruction_text_none_when_empty() {
        let registry = ToolRegistry::new();
        assert!(registry.instruction_text().is_none());
    }

    #[test]
    fn instruction_text_describes_envelope_and_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let text = registry.instruction_text().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            doc["tool_call_format"]["required"],
            serde_json::json!(["tool_name", "arguments"])
        );
        assert_eq!(doc["tools"][0]["name"], "echo");
        assert_eq!(
            doc["tools"][0]["arguments_schema"]["required"],
            serde_json::json!(["text"])
        );
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello world"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world");
        assert_eq!(result.call_id, "call_1");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    /// A tool that always fails, for error-wrapping tests.
    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}, "required": []})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            Err(ToolError::ExecutionFailed {
                tool_name: "broken".into(),
                reason: "boom".into(),
            })
        }
    }

    #[tokio::test]
    async fn registry_wraps_tool_failures_as_text() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(BrokenTool));

        let call = ToolCall {
            id: "call_9".into(),
            name: "broken".into(),
            arguments: serde_json::json!({}),
        };
        let result = registry.execute(&call).await.unwrap();

        assert!(!result.success);
        assert!(result.output.starts_with("Error executing tool broken:"));
        assert_eq!(result.call_id, "call_9");
    }
}
