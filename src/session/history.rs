use std::fmt;

use crate::chat::Usage;

const PREAMBLE: &str = "You are a helpful AI assistant.";
const HISTORY_HEADER: &str =
    "You are a helpful AI assistant. The following is the recent chat history.\n";

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "User"),
            ChatRole::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One message of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    /// Names of the files attached to this message.
    pub attachments: Vec<String>,
    /// Model that produced an assistant message.
    pub model: Option<String>,
    /// Usage of the exchange, for successful assistant messages.
    pub usage: Option<Usage>,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>, attachments: Vec<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            attachments,
            model: None,
            usage: None,
        }
    }

    pub fn assistant(
        text: impl Into<String>,
        model: impl Into<String>,
        usage: Option<Usage>,
    ) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            attachments: Vec::new(),
            model: Some(model.into()),
            usage,
        }
    }
}

/// Limits applied to the rendered history and the pinned files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Number of most recent messages rendered into the prompt.
    pub max_turns: usize,
    /// Rendered history is cut to its last `max_chars` characters.
    pub max_chars: usize,
    /// Number of uploaded files kept pinned across turns.
    pub max_pinned: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: 6,
            max_chars: 6000,
            max_pinned: 6,
        }
    }
}

/// Renders the tail of the transcript as plain text.
pub fn history_prompt(messages: &[ChatEntry], config: &HistoryConfig) -> String {
    if messages.is_empty() {
        return PREAMBLE.to_string();
    }

    let start = messages.len().saturating_sub(config.max_turns);
    let mut blocks = vec![HISTORY_HEADER.to_string()];
    blocks.extend(messages[start..].iter().map(render_entry));
    let history = blocks.join("\n");
    keep_last_chars(history, config.max_chars)
}

/// Wraps the user text in the rendered history, leaving the assistant turn open.
pub fn compose_prompt(history: &str, text: &str) -> String {
    let history = if history.is_empty() { PREAMBLE } else { history };
    format!("{history}\n\nUser: {text}\nAssistant:")
}

fn render_entry(entry: &ChatEntry) -> String {
    if entry.attachments.is_empty() {
        format!("{}: {}\n", entry.role, entry.text)
    } else {
        format!(
            "{}: {}\n[Attached files: {}]\n",
            entry.role,
            entry.text,
            entry.attachments.join(", ")
        )
    }
}

fn keep_last_chars(text: String, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    match text.char_indices().nth(count - max_chars) {
        Some((offset, _)) => text[offset..].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HistoryConfig {
        HistoryConfig::default()
    }

    #[test]
    fn empty_transcript_is_bare_preamble() {
        assert_eq!(history_prompt(&[], &config()), "You are a helpful AI assistant.");
    }

    #[test]
    fn renders_roles_and_attachment_names() {
        let messages = vec![
            ChatEntry::user("What is in here?", vec!["a.png".into(), "b.pdf".into()]),
            ChatEntry::assistant("A cat and an invoice.", "gemini-2.5-flash", None),
        ];

        assert_eq!(
            history_prompt(&messages, &config()),
            "You are a helpful AI assistant. The following is the recent chat history.\n\n\
             User: What is in here?\n[Attached files: a.png, b.pdf]\n\n\
             Assistant: A cat and an invoice.\n"
        );
    }

    #[test]
    fn keeps_only_the_most_recent_turns() {
        let messages: Vec<ChatEntry> = (0..10)
            .map(|i| ChatEntry::user(format!("message {i}"), Vec::new()))
            .collect();

        let history = history_prompt(&messages, &config());

        assert!(!history.contains("message 3"));
        assert!(history.contains("message 4"));
        assert!(history.contains("message 9"));
    }

    #[test]
    fn trims_to_last_characters_on_char_boundaries() {
        let messages = vec![ChatEntry::user("é".repeat(50), Vec::new())];
        let config = HistoryConfig {
            max_chars: 10,
            ..HistoryConfig::default()
        };

        let history = history_prompt(&messages, &config);

        assert_eq!(history.chars().count(), 10);
        assert_eq!(history, format!("{}\n", "é".repeat(9)));
    }

    #[test]
    fn composes_open_assistant_turn() {
        assert_eq!(
            compose_prompt("H", "hi"),
            "H\n\nUser: hi\nAssistant:"
        );
        assert_eq!(
            compose_prompt("", "hi"),
            "You are a helpful AI assistant.\n\nUser: hi\nAssistant:"
        );
    }
}
