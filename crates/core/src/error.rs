//! Error types for the convo domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum, folded into the top-level
//! `Error` via `#[from]`.
//!
//! A failing tool is reported back to the model as an ordinary tool-result
//! message, so only the lookup/dispatch layer ever handles `ToolError`.
//! `MalformedToolCall` is the one hard failure in the chat loop: tool-call
//! arguments that are not valid JSON mean the exchange protocol itself
//! broke down.

use thiserror::Error;

/// The top-level error type for all convo operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Broken tool-call exchange ---
    #[error("Malformed tool call for '{tool_name}': {reason}")]
    MalformedToolCall { tool_name: String, reason: String },

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool {0} not found")]
    NotFound(String),

    #[error("{reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("{0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn malformed_tool_call_names_the_tool() {
        let err = Error::MalformedToolCall {
            tool_name: "add_numbers".into(),
            reason: "expected value at line 1 column 1".into(),
        };
        assert!(err.to_string().contains("add_numbers"));
        assert!(err.to_string().contains("Malformed"));
    }

    #[test]
    fn tool_error_converts_into_top_level() {
        let err: Error = ToolError::NotFound("get_weather".into()).into();
        assert!(matches!(err, Error::Tool(ToolError::NotFound(_))));
    }
}
