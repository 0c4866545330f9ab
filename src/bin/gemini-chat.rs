#[path = "gemini-chat/app/mod.rs"]
mod app;
#[path = "gemini-chat/args.rs"]
mod args;
#[path = "gemini-chat/config/mod.rs"]
mod config;
#[path = "gemini-chat/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
