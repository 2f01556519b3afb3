//! Completion provider implementations for convo.
//!
//! All providers implement the `convo_core::Provider` trait. The router
//! builds and selects providers from configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config};
