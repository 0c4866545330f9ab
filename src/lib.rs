//! Chat adapter for the Gemini Developer API.
//!
//! The crate covers the parts of a chat client that talk to the remote
//! service:
//!
//! - [`files::FileUploader`] stores attachments in the remote file store,
//!   retrying transient failures and waiting briefly for activation.
//! - [`chat::build_contents`] assembles the prompt text and file handles of a turn.
//! - [`chat::ResponseStreamer`] streams a reply as text fragments followed by a
//!   single terminal [`chat::Usage`] event.
//! - [`chat::normalize_usage`] maps the various usage-metadata shapes onto one
//!   [`chat::Usage`] value.
//!
//! [`session::ChatSession`] ties these together for a single conversation.
//!
//! ```no_run
//! use futures::StreamExt;
//! use gemini_chat::{builder::ClientBuilder, chat::StreamEvent};
//!
//! # async fn run() -> Result<(), gemini_chat::error::LLMError> {
//! let client = ClientBuilder::new().model("gemini-2.5-flash").build()?;
//! let uploader = client.uploader();
//! let streamer = client.streamer();
//!
//! let chart = uploader.upload("chart.png", &std::fs::read("chart.png")?, None).await?;
//! let mut events = streamer
//!     .stream(client.model(), "Describe this chart.", &[chart])
//!     .await?;
//! while let Some(event) = events.next().await {
//!     match event? {
//!         StreamEvent::Text(fragment) => print!("{fragment}"),
//!         StreamEvent::Usage(usage) => println!("\n[{} tokens]", usage.total),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod chat;
pub mod client;
pub mod error;
pub mod files;
pub mod retry;
pub mod secret_store;
pub mod session;

pub use builder::ClientBuilder;
pub use client::GeminiClient;
pub use error::LLMError;
