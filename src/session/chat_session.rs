use futures::StreamExt;

use crate::{
    chat::{ResponseStreamer, StreamEvent, Usage},
    client::GeminiClient,
    error::LLMError,
    files::{Attachment, FileUploader, UploadedReference},
};

use super::{
    history::{compose_prompt, history_prompt, ChatEntry, HistoryConfig},
    pinned::PinnedFiles,
};

/// Text recorded for a reply that carried no text.
pub const NO_TEXT_RESPONSE: &str = "_(no text response)_";

/// What the user sends in one turn.
#[derive(Debug, Clone, Default)]
pub struct Turn {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl Turn {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Outcome of a successful turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub text: String,
    pub usage: Usage,
}

/// Notice recorded in place of (or after) the reply when a turn fails.
pub fn failure_notice(err: &LLMError) -> String {
    format!("⚠️ {}\n\n`{}: {err}`", err.friendly_message(), err.kind())
}

/// Transcript, pinned files and usage totals of one conversation.
pub struct ChatSession {
    uploader: FileUploader,
    streamer: ResponseStreamer,
    model: String,
    config: HistoryConfig,
    streaming: bool,
    messages: Vec<ChatEntry>,
    pinned: PinnedFiles,
    totals: Usage,
}

impl ChatSession {
    pub fn new(
        uploader: FileUploader,
        streamer: ResponseStreamer,
        model: impl Into<String>,
    ) -> Self {
        let config = HistoryConfig::default();
        Self {
            uploader,
            streamer,
            model: model.into(),
            pinned: PinnedFiles::new(config.max_pinned),
            config,
            streaming: true,
            messages: Vec::new(),
            totals: Usage::default(),
        }
    }

    /// Session using the client's uploader, streamer and default model.
    pub fn from_client(client: &GeminiClient) -> Self {
        Self::new(client.uploader(), client.streamer(), client.model())
    }

    /// Replaces the history limits. Already pinned files are kept.
    pub fn with_history_config(mut self, config: HistoryConfig) -> Self {
        let mut pinned = PinnedFiles::new(config.max_pinned);
        for reference in self.pinned.as_slice() {
            pinned.pin(reference.clone());
        }
        self.pinned = pinned;
        self.config = config;
        self
    }

    /// Whether replies are streamed (default) or fetched in one call.
    pub fn streaming(mut self, enable: bool) -> Self {
        self.streaming = enable;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn messages(&self) -> &[ChatEntry] {
        &self.messages
    }

    pub fn pinned(&self) -> &PinnedFiles {
        &self.pinned
    }

    pub fn clear_pinned(&mut self) {
        self.pinned.clear();
    }

    /// Usage summed over every successful turn.
    pub fn usage_totals(&self) -> Usage {
        self.totals
    }

    /// Rendered history of the transcript so far.
    pub fn history_prompt(&self) -> String {
        history_prompt(&self.messages, &self.config)
    }

    /// Sends one turn and records both sides of it.
    ///
    /// `on_fragment` receives reply text as it arrives. When the turn fails,
    /// the assistant message keeps whatever text had arrived followed by
    /// [`failure_notice`], and the error is returned.
    pub async fn send<F>(&mut self, turn: Turn, mut on_fragment: F) -> Result<TurnReply, LLMError>
    where
        F: FnMut(&str) + Send,
    {
        let history = self.history_prompt();
        let names = turn.attachments.iter().map(|a| a.name.clone()).collect();
        self.messages.push(ChatEntry::user(turn.text.clone(), names));

        let mut reply = String::new();
        match self.exchange(&history, &turn, &mut reply, &mut on_fragment).await {
            Ok(usage) => {
                let text = if reply.is_empty() {
                    NO_TEXT_RESPONSE.to_string()
                } else {
                    reply
                };
                self.messages
                    .push(ChatEntry::assistant(text.clone(), self.model.clone(), Some(usage)));
                self.totals += usage;
                Ok(TurnReply { text, usage })
            }
            Err(err) => {
                log::warn!("turn failed: {err}");
                let notice = failure_notice(&err);
                let text = if reply.is_empty() {
                    notice
                } else {
                    format!("{reply}\n\n{notice}")
                };
                self.messages
                    .push(ChatEntry::assistant(text, self.model.clone(), None));
                Err(err)
            }
        }
    }

    async fn exchange<F>(
        &mut self,
        history: &str,
        turn: &Turn,
        reply: &mut String,
        on_fragment: &mut F,
    ) -> Result<Usage, LLMError>
    where
        F: FnMut(&str) + Send,
    {
        let uploaded = self.uploader.upload_all(&turn.attachments).await?;
        let references = self.references_for(&uploaded);
        for reference in uploaded {
            self.pinned.pin(reference);
        }
        let prompt = compose_prompt(history, &turn.text);

        if !self.streaming {
            let (text, usage) = self.streamer.call(&self.model, &prompt, &references).await?;
            if !text.is_empty() {
                on_fragment(&text);
                reply.push_str(&text);
            }
            return Ok(usage);
        }

        let mut events = self.streamer.stream(&self.model, &prompt, &references).await?;
        let mut usage = Usage::default();
        while let Some(event) = events.next().await {
            match event? {
                StreamEvent::Text(fragment) => {
                    on_fragment(&fragment);
                    reply.push_str(&fragment);
                }
                StreamEvent::Usage(total) => usage = total,
            }
        }
        Ok(usage)
    }

    /// Files sent with a turn: the already pinned ones, then this turn's uploads.
    fn references_for(&self, uploaded: &[UploadedReference]) -> Vec<UploadedReference> {
        let mut references = self.pinned.as_slice().to_vec();
        for reference in uploaded {
            if !self.pinned.contains(reference.handle()) {
                references.push(reference.clone());
            }
        }
        references
    }
}
