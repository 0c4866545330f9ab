//! A single conversation on top of the uploader and the streamer.
//!
//! The remote model is stateless, so every turn re-sends a short rendering of
//! the recent transcript together with the files pinned in earlier turns.

mod chat_session;
mod history;
mod pinned;

pub use chat_session::{failure_notice, ChatSession, Turn, TurnReply, NO_TEXT_RESPONSE};
pub use history::{compose_prompt, history_prompt, ChatEntry, ChatRole, HistoryConfig};
pub use pinned::PinnedFiles;
