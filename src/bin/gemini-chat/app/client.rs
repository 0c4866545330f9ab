use gemini_chat::{session::ChatSession, ClientBuilder, GeminiClient};

use crate::args::CliArgs;
use crate::config::AppConfig;

/// Builds the client from the config file, with command-line flags on top.
pub fn build_client(args: &CliArgs, config: &AppConfig) -> anyhow::Result<GeminiClient> {
    let upload = &config.upload;
    let mut builder = ClientBuilder::new()
        .upload_attempts(upload.max_attempts)
        .upload_backoff(upload.base_delay_ms, upload.max_delay_ms)
        .upload_jitter(upload.jitter)
        .activation_poll(upload.poll_interval_ms, upload.max_polls);

    if let Some(key) = &args.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(model) = args.model.as_ref().or(config.model.as_ref()) {
        builder = builder.model(model.clone());
    }
    if let Some(url) = args.base_url.as_ref().or(config.base_url.as_ref()) {
        builder = builder.base_url(url.clone());
    }
    if let Some(timeout) = config.timeout_seconds {
        builder = builder.timeout_seconds(timeout);
    }
    Ok(builder.build()?)
}

pub fn build_session(client: &GeminiClient, args: &CliArgs, config: &AppConfig) -> ChatSession {
    ChatSession::from_client(client)
        .with_history_config((&config.history).into())
        .streaming(!args.no_stream)
}
