mod client;
mod commands;
mod one_shot;
mod render;
mod repl;

use clap::Parser;

use crate::args::{CliArgs, Command};
use crate::config::load_config;
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = load_config(args.config.clone())?;
    init_logging(&config.logging)?;

    if let Some(Command::SetKey { key }) = &args.command {
        return commands::set_key(key);
    }

    let client = client::build_client(&args, &config)?;
    let session = client::build_session(&client, &args, &config);
    log::info!("chatting with {}", client.model());

    match args.prompt.as_deref() {
        Some(prompt) => one_shot::run(session, prompt, &args.attach).await,
        None => repl::run(session).await,
    }
}
