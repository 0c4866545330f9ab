use std::pin::Pin;

use futures::stream::Stream;
use serde_json::Value;

use crate::error::LLMError;

use super::usage::Usage;

/// Event yielded while a reply streams in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Next fragment of reply text, to be appended to the previous ones
    Text(String),
    /// Usage for the whole exchange; always the last event of a stream
    Usage(Usage),
}

/// Raw response events as decoded from the wire.
pub type RawEventStream = Pin<Box<dyn Stream<Item = Result<Value, LLMError>> + Send>>;

/// Normalized reply events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LLMError>> + Send>>;
