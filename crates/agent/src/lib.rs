//! The chat session loop: the heart of Convo.
//!
//! One `chat` call runs a bounded cycle:
//!
//! 1. **Append** the user's message to the transcript
//! 2. **Annotate** a snapshot with the tool-call instruction message
//! 3. **Send** it to the completion provider
//! 4. **If tool calls**: execute each in order, append the results, loop
//! 5. **If text**: return it as the answer
//!
//! The cycle repeats until the model answers with text only or the
//! iteration cap is reached, in which case a fixed sentinel string is
//! returned instead.

pub mod instructions;
pub mod session;
pub mod transcript;

pub use instructions::InstructionInjector;
pub use session::ChatSession;
pub use transcript::TranscriptLogger;

#[cfg(test)]
pub(crate) mod test_helpers;
