//! Built-in tool implementations for Convo.
//!
//! Tools give the model the ability to act during a chat: do arithmetic,
//! transform text, read the clock, and check the weather. Each tool is a
//! typed function with a JSON schema the model sees.

pub mod datetime;
pub mod math;
pub mod text;
pub mod weather;

use convo_core::tool::ToolRegistry;

pub use weather::WeatherTool;

/// Create a default tool registry with all built-in tools.
///
/// Registration order is what the model sees in the tool listing; keep it
/// stable.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(math::AddNumbersTool));
    registry.register(Box::new(math::MultiplyNumbersTool));
    registry.register(Box::new(math::PowerTool));
    registry.register(Box::new(datetime::CurrentDateTimeTool));
    registry.register(Box::new(text::UppercaseTool));
    registry.register(Box::new(text::CountWordsTool));
    registry.register(Box::new(weather::WeatherTool::from_env()));
    registry
}
