use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token accounting for one model exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt, attachments included
    pub prompt: u64,
    /// Tokens in the generated reply
    pub output: u64,
    /// Tokens spent on reasoning ("thoughts")
    pub reasoning: u64,
    /// Total billed tokens
    pub total: u64,
}

impl Usage {
    /// Creates a usage record whose total is the sum of its parts.
    pub fn new(prompt: u64, output: u64, reasoning: u64) -> Self {
        Self {
            prompt,
            output,
            reasoning,
            total: prompt.saturating_add(output).saturating_add(reasoning),
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, other: Self) {
        self.prompt = self.prompt.saturating_add(other.prompt);
        self.output = self.output.saturating_add(other.output);
        self.reasoning = self.reasoning.saturating_add(other.reasoning);
        self.total = self.total.saturating_add(other.total);
    }
}

/// Candidate field names for one quantity, in priority order.
struct UsageField {
    candidates: &'static [&'static str],
}

impl UsageField {
    /// First candidate that is present, non-null and a non-negative integer.
    ///
    /// Integers encoded as JSON strings (the protobuf JSON mapping for int64)
    /// are accepted too.
    fn read(&self, raw: &Value) -> Option<u64> {
        self.candidates
            .iter()
            .filter_map(|key| raw.get(key))
            .find_map(as_count)
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

const PROMPT: UsageField = UsageField {
    candidates: &[
        "promptTokenCount",
        "prompt_token_count",
        "input_tokens",
        "prompt_tokens",
    ],
};

const OUTPUT: UsageField = UsageField {
    candidates: &[
        "candidatesTokenCount",
        "candidates_token_count",
        "responseTokenCount",
        "response_token_count",
        "output_tokens",
        "completion_tokens",
    ],
};

const REASONING: UsageField = UsageField {
    candidates: &[
        "thoughtsTokenCount",
        "thoughts_token_count",
        "reasoning_tokens",
    ],
};

const TOTAL: UsageField = UsageField {
    candidates: &["totalTokenCount", "total_token_count", "total_tokens"],
};

/// Field names under which a response carries its usage metadata.
const USAGE_CONTAINERS: &[&str] = &["usageMetadata", "usage_metadata", "usage"];

/// Maps raw usage metadata onto a [`Usage`].
///
/// Missing quantities count as zero. Without an explicit total, the total is
/// the sum of the other three.
pub fn normalize_usage(raw: &Value) -> Usage {
    let prompt = PROMPT.read(raw).unwrap_or(0);
    let output = OUTPUT.read(raw).unwrap_or(0);
    let reasoning = REASONING.read(raw).unwrap_or(0);
    match TOTAL.read(raw) {
        Some(total) => Usage {
            prompt,
            output,
            reasoning,
            total,
        },
        None => Usage::new(prompt, output, reasoning),
    }
}

/// Finds the usage metadata of a response or stream event and normalizes it.
///
/// Returns `None` when the event carries no (or null) metadata.
pub fn extract_usage(event: &Value) -> Option<Usage> {
    USAGE_CONTAINERS
        .iter()
        .filter_map(|key| event.get(key))
        .find(|raw| raw.is_object())
        .map(normalize_usage)
}
