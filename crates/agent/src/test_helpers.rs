//! Shared test helpers for session tests.

use std::sync::Mutex;

use convo_core::error::ProviderError;
use convo_core::message::{Message, MessageToolCall};
use convo_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// A provider that returns a scripted sequence of responses.
///
/// Each call to `complete` returns the next response in the queue.
/// Panics if more calls are made than responses provided.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ScriptedOutcome>>,
    call_count: Mutex<usize>,
}

pub enum ScriptedOutcome {
    Respond(ProviderResponse),
    Fail(ProviderError),
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(ScriptedOutcome::Respond).collect()),
            call_count: Mutex::new(0),
        }
    }

    pub fn with_outcomes(outcomes: Vec<ScriptedOutcome>) -> Self {
        Self {
            responses: Mutex::new(outcomes),
            call_count: Mutex::new(0),
        }
    }

    /// A provider that returns a single text response (no tool calls).
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// A provider that fails every call with the given error.
    pub fn always_failing(error: ProviderError) -> Self {
        Self::with_outcomes(vec![ScriptedOutcome::Fail(error)])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let mut responses = self.responses.lock().unwrap();

        if responses.is_empty() {
            panic!("ScriptedProvider: no more responses (call #{})", *count + 1);
        }

        *count += 1;
        match responses.remove(0) {
            ScriptedOutcome::Respond(response) => Ok(response),
            ScriptedOutcome::Fail(error) => Err(error),
        }
    }
}

/// A provider that answers every call with the same tool-call request.
/// Useful for iteration-cap tests.
pub struct AlwaysToolCallingProvider {
    call_count: Mutex<usize>,
}

impl AlwaysToolCallingProvider {
    pub fn new() -> Self {
        Self {
            call_count: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for AlwaysToolCallingProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        Ok(make_tool_call_response(
            vec![make_tool_call(
                &format!("call_{count}"),
                "add_numbers",
                serde_json::json!({"a": 1, "b": 1}),
            )],
            "",
        ))
    }
}

/// Create a simple text response (no tool calls).
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "openai/gpt-4o".into(),
    }
}

/// Create a response carrying tool calls, with optional visible content.
pub fn make_tool_call_response(
    tool_calls: Vec<MessageToolCall>,
    content: &str,
) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(content).with_tool_calls(tool_calls),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "openai/gpt-4o".into(),
    }
}

/// Helper to create a tool call with pre-encoded arguments.
pub fn make_tool_call(id: &str, name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: args.to_string(),
    }
}

/// A tool call whose arguments are not valid JSON.
pub fn make_malformed_tool_call(id: &str, name: &str) -> MessageToolCall {
    MessageToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: "{not json".to_string(),
    }
}
