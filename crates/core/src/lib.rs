//! # Convo Core
//!
//! Domain types, traits, and error definitions for the convo conversational
//! agent. This crate performs no I/O — it defines the vocabulary that every
//! other crate implements against.
//!
//! ## Design Philosophy
//!
//! The seams of the system are traits defined here (`Provider`, `Tool`);
//! implementations live in their own crates. This keeps the dependency graph
//! pointing inward and makes the chat loop testable with scripted stand-ins.

pub mod conversation;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use conversation::{Conversation, ConversationId};
pub use error::{Error, ProviderError, Result, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{ModelInfo, Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
