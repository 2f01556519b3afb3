//! The chat session: one conversation, one provider, one tool registry.
//!
//! `ChatSession::chat` drives the bounded request/execute/append cycle
//! described in the crate docs. Provider failures come back as readable
//! text (the conversation survives them); a malformed tool-call payload
//! is the one failure that aborts the call with a hard error.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use convo_core::conversation::Conversation;
use convo_core::error::Error;
use convo_core::event::{DomainEvent, EventBus};
use convo_core::provider::{Provider, ProviderRequest};
use convo_core::tool::{ToolCall, ToolRegistry};
use tracing::{debug, info, warn};

use crate::instructions::InstructionInjector;
use crate::transcript::{ToolCallRecord, TranscriptLogger};

/// Returned when the model keeps requesting tools past the iteration cap.
pub const MAX_ITERATIONS_MESSAGE: &str = "Tool execution loop exceeded maximum iterations.";

/// Default cap on model round-trips within one `chat` call.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// A single interactive conversation with tool support.
pub struct ChatSession {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    injector: InstructionInjector,
    conversation: Conversation,
    max_iterations: u32,
    event_bus: Arc<EventBus>,
    transcript: Option<TranscriptLogger>,
}

impl ChatSession {
    /// Create a new session seeded with the given system prompt.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        system_prompt: impl Into<String>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            injector: InstructionInjector::new(tools.clone()),
            tools,
            conversation: Conversation::new(system_prompt),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            event_bus,
            transcript: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the cap on model round-trips per `chat` call.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Attach a transcript logger.
    pub fn with_transcript(mut self, transcript: TranscriptLogger) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Process one user message and return the assistant's reply.
    ///
    /// Loops model call / tool execution until the model answers with plain
    /// text, the provider fails (the failure text becomes the reply), or the
    /// iteration cap is hit (the reply is [`MAX_ITERATIONS_MESSAGE`]).
    pub async fn chat(&mut self, user_input: &str) -> Result<String, Error> {
        self.conversation.append_user(user_input);

        info!(
            conversation_id = %self.conversation.id,
            model = %self.model,
            "processing user message"
        );

        let tool_definitions = self.tools.definitions();
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            let outgoing = self.injector.annotate(self.conversation.snapshot());
            if let Some(transcript) = &self.transcript {
                transcript.record_request(&outgoing, self.tools.len());
            }

            debug!(
                iteration = iterations,
                messages = outgoing.len(),
                tools = tool_definitions.len(),
                "sending completion request"
            );

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: outgoing,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(provider = %self.provider.name(), error = %e, "completion failed");
                    self.event_bus.publish(DomainEvent::ErrorOccurred {
                        context: "completion_request".into(),
                        error_message: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    return Ok(format!(
                        "Error communicating with {}: {e}",
                        provider_label(self.provider.name())
                    ));
                }
            };

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    conversation_id: self.conversation.id.to_string(),
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: Utc::now(),
                });
            }

            // Record the assistant message exactly as produced, tool calls
            // and all, before anything else happens.
            let assistant = response.message;
            let tool_calls = assistant.tool_calls.clone();
            let content = assistant.content.clone();
            self.conversation.append_assistant(assistant);

            if tool_calls.is_empty() {
                debug!(iteration = iterations, "final text response");
                return Ok(content);
            }

            for tc in &tool_calls {
                let arguments: serde_json::Value =
                    serde_json::from_str(&tc.arguments).map_err(|e| {
                        self.event_bus.publish(DomainEvent::ErrorOccurred {
                            context: "tool_arguments".into(),
                            error_message: e.to_string(),
                            timestamp: Utc::now(),
                        });
                        Error::MalformedToolCall {
                            tool_name: tc.name.clone(),
                            reason: e.to_string(),
                        }
                    })?;

                self.event_bus.publish(DomainEvent::ToolCallRequested {
                    tool_name: tc.name.clone(),
                    arguments: arguments.clone(),
                    timestamp: Utc::now(),
                });

                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments,
                };

                let started = Instant::now();
                let outcome = self.tools.execute(&call).await;
                let duration_ms = started.elapsed().as_millis() as u64;

                let (result_text, success) = match outcome {
                    Ok(result) => (result.output, result.success),
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "tool dispatch failed");
                        (format!("Tool execution failed: {e}"), false)
                    }
                };

                self.event_bus.publish(DomainEvent::ToolExecuted {
                    tool_name: tc.name.clone(),
                    success,
                    duration_ms,
                    timestamp: Utc::now(),
                });

                if let Some(transcript) = &self.transcript {
                    transcript.record_tool_call(&ToolCallRecord {
                        tool_call_id: &call.id,
                        tool_name: &call.name,
                        arguments: &call.arguments,
                        status: if success { "success" } else { "error" },
                        result: success.then_some(result_text.as_str()),
                        error: (!success).then_some(result_text.as_str()),
                    });
                }

                self.conversation
                    .append_tool_result(&tc.id, &tc.name, result_text);
            }
        }

        warn!(
            conversation_id = %self.conversation.id,
            max_iterations = self.max_iterations,
            "iteration cap reached"
        );
        Ok(MAX_ITERATIONS_MESSAGE.into())
    }

    /// Replace the system prompt; clears the conversation history.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.conversation.set_system_prompt(prompt);
    }

    /// Clear the history, keeping the current system prompt.
    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// Switch the model for subsequent requests.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

/// Display names for the error text shown to users.
fn provider_label(name: &str) -> &str {
    match name {
        "openrouter" => "OpenRouter",
        "openai" => "OpenAI",
        "ollama" => "Ollama",
        _ => name,
    }
}
