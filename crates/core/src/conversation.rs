//! Conversation store — the append-only transcript.
//!
//! The store owns the ordered message log for one session. Messages are only
//! ever appended; the sole way to shrink the log is a reset, which seeds it
//! with exactly one system message built from the stored system prompt. The
//! message list is private so the append-order invariant cannot be broken
//! from outside — readers get independent copies via [`Conversation::snapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Message, Role};

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An append-only, role-ordered message transcript.
///
/// Invariant: after construction or any reset, `snapshot()[0]` is a system
/// message carrying the current system prompt, and it stays at index 0 until
/// the next reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub updated_at: DateTime<Utc>,

    system_prompt: String,
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation seeded with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut conv = Self {
            id: ConversationId::new(),
            created_at: now,
            updated_at: now,
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
        };
        conv.reset();
        conv
    }

    /// Clear the history and re-seed with the current system prompt.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.push(Message::system(self.system_prompt.clone()));
    }

    /// Replace the system prompt and reset the conversation.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = prompt.into();
        self.reset();
    }

    /// The current system prompt.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Append a user message.
    pub fn append_user(&mut self, text: impl Into<String>) {
        self.push(Message::user(text));
    }

    /// Append an assistant message exactly as the model produced it,
    /// including any tool calls and even when the content is empty.
    pub fn append_assistant(&mut self, message: Message) {
        self.push(message);
    }

    /// Append a tool result. The result is always recorded as text, whatever
    /// shape the tool produced — the transcript is textual by construction.
    pub fn append_tool_result(
        &mut self,
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: impl Into<String>,
    ) {
        self.push(Message::tool_result(call_id, tool_name, result));
    }

    /// An independent copy of the transcript. Mutating the copy never
    /// affects the store.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Number of messages currently in the transcript (system seed included).
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// One-line summary for status displays.
    pub fn summary(&self) -> String {
        // The seed system message doesn't count as conversational traffic.
        let total = self.messages.len().saturating_sub(1);
        let prompt: String = self.system_prompt.chars().take(50).collect();
        format!("Conversation with {total} messages. System: {prompt}...")
    }

    fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_is_seeded_with_system_message() {
        let conv = Conversation::new("You are helpful.");
        let snapshot = conv.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(snapshot[0].content, "You are helpful.");
    }

    #[test]
    fn appends_grow_the_transcript_in_order() {
        let mut conv = Conversation::new("sys");
        conv.append_user("first");
        conv.append_assistant(Message::assistant("second"));
        conv.append_tool_result("call_1", "add_numbers", "third");

        let snapshot = conv.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[1].content, "first");
        assert_eq!(snapshot[2].content, "second");
        assert_eq!(snapshot[3].content, "third");
        assert_eq!(snapshot[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn length_never_decreases_between_resets() {
        let mut conv = Conversation::new("sys");
        let mut previous = conv.len();
        for i in 0..10 {
            conv.append_user(format!("message {i}"));
            assert!(conv.len() > previous);
            previous = conv.len();
        }
        assert_eq!(conv.len(), 11);
    }

    #[test]
    fn set_system_prompt_resets_to_single_seed() {
        let mut conv = Conversation::new("old prompt");
        conv.append_user("hello");
        conv.append_assistant(Message::assistant("hi"));

        conv.set_system_prompt("Be terse.");

        let snapshot = conv.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(snapshot[0].content, "Be terse.");
        assert_eq!(conv.system_prompt(), "Be terse.");
    }

    #[test]
    fn reset_keeps_current_prompt() {
        let mut conv = Conversation::new("keep me");
        conv.append_user("noise");
        conv.reset();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.snapshot()[0].content, "keep me");
    }

    #[test]
    fn snapshot_is_independent_of_the_store() {
        let mut conv = Conversation::new("sys");
        conv.append_user("original");

        let mut snapshot = conv.snapshot();
        snapshot.push(Message::user("intruder"));
        snapshot[1].content = "mutated".into();

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.snapshot()[1].content, "original");
    }

    #[test]
    fn summary_excludes_the_seed_message() {
        let mut conv = Conversation::new("You are a helpful assistant with a long prompt text");
        assert!(conv.summary().starts_with("Conversation with 0 messages."));

        conv.append_user("q");
        conv.append_assistant(Message::assistant("a"));
        assert!(conv.summary().starts_with("Conversation with 2 messages."));
    }
}
