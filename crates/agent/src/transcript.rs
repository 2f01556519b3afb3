//! Session transcript logging.
//!
//! Appends timestamped records of every outgoing request and every tool
//! call to a plain-text log file for audit. Logging is best-effort: a
//! write failure is logged and swallowed, never surfaced to the
//! conversation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use convo_core::message::Message;
use serde::Serialize;
use tracing::warn;

/// Appends audit records to a session log file.
pub struct TranscriptLogger {
    path: PathBuf,
}

/// One recorded tool call.
#[derive(Debug, Serialize)]
pub struct ToolCallRecord<'a> {
    pub tool_call_id: &'a str,
    pub tool_name: &'a str,
    pub arguments: &'a serde_json::Value,
    pub status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RequestRecord<'a> {
    messages: &'a [Message],
    available_tool_count: usize,
}

impl TranscriptLogger {
    /// Open a logger appending to `path` and mark the session start.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let logger = Self {
            path: path.as_ref().to_path_buf(),
        };
        logger.write_raw(&format!("\n--- Session started {} ---\n", timestamp()));
        logger
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the full annotated snapshot about to be sent to the model.
    pub fn record_request(&self, messages: &[Message], available_tool_count: usize) {
        let record = RequestRecord {
            messages,
            available_tool_count,
        };
        self.record("Messages sent to model", &record);
    }

    /// Record one tool call with its outcome.
    pub fn record_tool_call(&self, record: &ToolCallRecord<'_>) {
        self.record("Tool call", record);
    }

    fn record<T: Serialize>(&self, label: &str, payload: &T) {
        let body = match serde_json::to_string_pretty(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!(label, error = %e, "failed to serialize transcript record");
                return;
            }
        };
        self.append(label, &body);
    }

    /// Append one timestamped, labeled entry.
    fn append(&self, label: &str, payload: &str) {
        let mut entry = format!("[{}] {label}\n{payload}", timestamp());
        if !entry.ends_with('\n') {
            entry.push('\n');
        }
        self.write_raw(&entry);
    }

    fn write_raw(&self, text: &str) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(text.as_bytes()));
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to write transcript");
        }
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_header_is_written_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation.log");

        let _logger = TranscriptLogger::new(&path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("--- Session started "));
        assert!(contents.trim_end().ends_with("---"));
    }

    #[test]
    fn request_record_includes_messages_and_tool_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation.log");
        let logger = TranscriptLogger::new(&path);

        let messages = vec![Message::system("sys"), Message::user("what is 2+3?")];
        logger.record_request(&messages, 7);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Messages sent to model"));
        assert!(contents.contains("what is 2+3?"));
        assert!(contents.contains("\"available_tool_count\": 7"));
    }

    #[test]
    fn tool_call_record_captures_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation.log");
        let logger = TranscriptLogger::new(&path);

        let arguments = serde_json::json!({"a": 2, "b": 3});
        logger.record_tool_call(&ToolCallRecord {
            tool_call_id: "call_1",
            tool_name: "add_numbers",
            arguments: &arguments,
            status: "success",
            result: Some("5"),
            error: None,
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Tool call"));
        assert!(contents.contains("\"tool_name\": \"add_numbers\""));
        assert!(contents.contains("\"status\": \"success\""));
        assert!(contents.contains("\"result\": \"5\""));
        assert!(!contents.contains("\"error\""));
    }

    #[test]
    fn sessions_append_rather_than_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation.log");

        let _first = TranscriptLogger::new(&path);
        let _second = TranscriptLogger::new(&path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("--- Session started ").count(), 2);
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let logger = TranscriptLogger::new("/proc/definitely/not/writable/conversation.log");
        logger.record_request(&[Message::user("hi")], 0);
    }
}
