use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::error::LLMError;
use crate::files::UploadedReference;
use crate::retry::{self, RetryConfig};

use super::content::build_contents;
use super::stream::{EventStream, RawEventStream, StreamEvent};
use super::transport::GenerateTransport;
use super::usage::{extract_usage, Usage};

/// Runs one model exchange and turns the raw responses into text fragments
/// and a final [`Usage`].
///
/// Opening the exchange is retried on transient failures; once the first
/// event has arrived, failures end the stream instead.
#[derive(Clone)]
pub struct ResponseStreamer {
    transport: Arc<dyn GenerateTransport>,
    retry: RetryConfig,
}

impl ResponseStreamer {
    pub fn new(transport: Arc<dyn GenerateTransport>) -> Self {
        Self {
            transport,
            retry: RetryConfig::defaults(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Streams the reply to `prompt` with `uploads` attached.
    ///
    /// The stream yields text fragments in arrival order, then exactly one
    /// [`StreamEvent::Usage`]. A transport failure is yielded as an error and
    /// ends the stream without the usage event.
    pub async fn stream(
        &self,
        model: &str,
        prompt: &str,
        uploads: &[UploadedReference],
    ) -> Result<EventStream, LLMError> {
        let contents = build_contents(prompt, uploads);
        log::debug!(
            "streaming {model} with {} file part(s)",
            contents.len().saturating_sub(1)
        );
        let label = format!("stream request to {model}");
        let raw = retry::run(&self.retry, &label, |_| {
            self.transport.stream_generate(model, &contents)
        })
        .await
        .into_result()?;
        Ok(aggregate_events(raw))
    }

    /// Same exchange without incremental output: returns the whole reply
    /// text and its usage at once.
    pub async fn call(
        &self,
        model: &str,
        prompt: &str,
        uploads: &[UploadedReference],
    ) -> Result<(String, Usage), LLMError> {
        let contents = build_contents(prompt, uploads);
        let label = format!("generate request to {model}");
        let response = retry::run(&self.retry, &label, |_| {
            self.transport.generate(model, &contents)
        })
        .await
        .into_result()?;
        let text = extract_text(&response).unwrap_or_default();
        let usage = extract_usage(&response).unwrap_or_default();
        Ok((text, usage))
    }
}

struct Aggregation {
    raw: RawEventStream,
    usage: Option<Usage>,
    finished: bool,
}

/// Folds raw events into [`StreamEvent`]s, keeping only the last usage
/// metadata seen and emitting it once the transport is exhausted.
pub(crate) fn aggregate_events(raw: RawEventStream) -> EventStream {
    let state = Aggregation {
        raw,
        usage: None,
        finished: false,
    };
    let events = stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            match state.raw.next().await {
                Some(Ok(event)) => {
                    if let Some(usage) = extract_usage(&event) {
                        state.usage = Some(usage);
                    }
                    if let Some(text) = extract_text(&event) {
                        return Some((Ok(StreamEvent::Text(text)), state));
                    }
                }
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(err), state));
                }
                None => {
                    state.finished = true;
                    let usage = state.usage.unwrap_or_default();
                    return Some((Ok(StreamEvent::Usage(usage)), state));
                }
            }
        }
    });
    Box::pin(events)
}

/// Text carried by a response event.
///
/// A non-empty top-level `text` field is used when present; otherwise the
/// text parts of the first candidate are concatenated, skipping thought
/// summaries.
pub(crate) fn extract_text(event: &Value) -> Option<String> {
    let top_level = event.get("text").and_then(Value::as_str).unwrap_or_default();
    if !top_level.is_empty() {
        return Some(top_level.to_string());
    }
    let parts = event
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    non_empty(text)
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
#[path = "streamer_tests.rs"]
mod tests;
