use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use crate::error::LLMError;

const SSE_DELIMITER: &str = "\n\n";
const DATA_PREFIX: &str = "data:";
const DONE_EVENT: &str = "[DONE]";

/// Splits an HTTP body into server-sent events and runs `parser` on each.
pub(crate) fn create_sse_stream<F, T>(
    response: reqwest::Response,
    parser: F,
) -> Pin<Box<dyn Stream<Item = Result<T, LLMError>> + Send>>
where
    F: Fn(&str) -> Result<Option<T>, LLMError> + Send + 'static,
    T: Send + 'static,
{
    // `None` marks the end of the body so a trailing unterminated event is parsed.
    let end_of_body = futures::stream::once(async { None::<Result<Bytes, reqwest::Error>> });
    let stream = response
        .bytes_stream()
        .map(Some)
        .chain(end_of_body)
        .scan(SseState::default(), move |state, chunk| {
            let results = match chunk {
                Some(chunk) => handle_chunk(state, chunk, &parser),
                None => state.finish(&parser),
            };
            async move { Some(results) }
        })
        .flat_map(futures::stream::iter);

    Box::pin(stream)
}

/// Decodes the JSON payload of one event.
///
/// Events without data lines and the `[DONE]` sentinel yield nothing; an
/// `error` object inside the payload becomes the matching [`LLMError`].
pub(crate) fn parse_json_event(event: &str) -> Result<Option<Value>, LLMError> {
    let data: Vec<&str> = event
        .lines()
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(str::trim_start)
        .collect();
    let payload = data.join("\n");
    let payload = payload.trim();
    if payload.is_empty() || payload == DONE_EVENT {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(payload)?;
    match LLMError::from_payload(&value) {
        Some(err) => Err(err),
        None => Ok(Some(value)),
    }
}

#[derive(Default)]
struct SseState {
    buffer: String,
    utf8_buffer: Vec<u8>,
}

fn handle_chunk<F, T>(
    state: &mut SseState,
    chunk: Result<Bytes, reqwest::Error>,
    parser: &F,
) -> Vec<Result<T, LLMError>>
where
    F: Fn(&str) -> Result<Option<T>, LLMError>,
{
    let bytes = match chunk {
        Ok(bytes) => bytes,
        Err(err) => return vec![Err(LLMError::from(err))],
    };

    state.push_bytes(&bytes);
    state.drain_events(parser)
}

impl SseState {
    fn push_bytes(&mut self, bytes: &[u8]) {
        self.utf8_buffer.extend_from_slice(bytes);
        match std::str::from_utf8(&self.utf8_buffer) {
            Ok(text) => {
                self.buffer.push_str(text);
                self.utf8_buffer.clear();
            }
            Err(err) => self.consume_valid_prefix(err.valid_up_to()),
        }
    }

    fn consume_valid_prefix(&mut self, valid_up_to: usize) {
        if valid_up_to == 0 {
            return;
        }

        let valid = String::from_utf8_lossy(&self.utf8_buffer[..valid_up_to]);
        self.buffer.push_str(&valid);
        self.utf8_buffer.drain(..valid_up_to);
    }

    fn drain_events<F, T>(&mut self, parser: &F) -> Vec<Result<T, LLMError>>
    where
        F: Fn(&str) -> Result<Option<T>, LLMError>,
    {
        let mut results = Vec::new();
        while let Some(event) = self.next_event() {
            match parser(&event) {
                Ok(Some(content)) => results.push(Ok(content)),
                Ok(None) => {}
                Err(err) => results.push(Err(err)),
            }
        }
        results
    }

    /// Parses what is left once the body has ended without a closing blank line.
    fn finish<F, T>(&mut self, parser: &F) -> Vec<Result<T, LLMError>>
    where
        F: Fn(&str) -> Result<Option<T>, LLMError>,
    {
        if !self.utf8_buffer.is_empty() {
            let rest = String::from_utf8_lossy(&self.utf8_buffer).into_owned();
            self.buffer.push_str(&rest);
            self.utf8_buffer.clear();
        }
        let mut results = self.drain_events(parser);
        let rest = std::mem::take(&mut self.buffer);
        if rest.trim().is_empty() {
            return results;
        }
        match parser(&rest) {
            Ok(Some(content)) => results.push(Ok(content)),
            Ok(None) => {}
            Err(err) => results.push(Err(err)),
        }
        results
    }

    fn next_event(&mut self) -> Option<String> {
        // The Gemini endpoint separates events with CRLF pairs.
        if self.buffer.contains("\r\n") {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }
        let pos = self.buffer.find(SSE_DELIMITER)?;
        let end = pos + SSE_DELIMITER.len();
        let event = self.buffer[..end].to_string();
        self.buffer.drain(..end);
        Some(event)
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
