//! Instruction injection: teach the model the tool-call JSON contract.
//!
//! Providers differ in how reliably they honor structured tool definitions,
//! so the contract is also spelled out in a synthetic system message built
//! from the registry's schemas. The message is injected into outgoing
//! snapshots only; the stored transcript never contains it.

use std::sync::Arc;

use convo_core::message::{Message, Role};
use convo_core::tool::ToolRegistry;

/// Metadata tag that marks the injected instruction message.
pub const INSTRUCTION_TAG: &str = "tool_instructions";

/// Builds and places the tool-instruction system message.
pub struct InstructionInjector {
    tools: Arc<ToolRegistry>,
}

impl InstructionInjector {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// The synthetic system message, or `None` when no tools are registered.
    fn instruction_message(&self) -> Option<Message> {
        let schema_json = self.tools.instruction_text()?;
        let mut message = Message::system(format!(
            "When you decide a tool is required, respond with a tool call JSON payload \
             that matches the following schema exactly:\n{schema_json}"
        ));
        message.metadata.insert(
            "name".into(),
            serde_json::Value::String(INSTRUCTION_TAG.into()),
        );
        Some(message)
    }

    /// Return `messages` with exactly one instruction message present.
    ///
    /// No tools registered: the input comes back unchanged. Instruction
    /// already present: unchanged (the loop annotates every iteration, so
    /// this must be idempotent). Otherwise the instruction is inserted
    /// right after the first system message, or at the front if there is
    /// no system message at all.
    pub fn annotate(&self, messages: Vec<Message>) -> Vec<Message> {
        let Some(instruction) = self.instruction_message() else {
            return messages;
        };

        if messages.iter().any(is_instruction_message) {
            return messages;
        }

        let mut annotated = Vec::with_capacity(messages.len() + 1);
        let mut pending = Some(instruction);

        for message in messages {
            let is_system = message.role == Role::System;
            annotated.push(message);
            if is_system {
                if let Some(instruction) = pending.take() {
                    annotated.push(instruction);
                }
            }
        }

        if let Some(instruction) = pending.take() {
            annotated.insert(0, instruction);
        }

        annotated
    }
}

/// True for the injected tool-instruction message.
pub fn is_instruction_message(message: &Message) -> bool {
    message.role == Role::System
        && message.metadata.get("name").and_then(|v| v.as_str()) == Some(INSTRUCTION_TAG)
}
