use std::path::PathBuf;

use gemini_chat::{
    files::Attachment,
    session::{ChatSession, Turn},
};

use super::render::{format_usage, print_failure, print_fragment};

pub async fn run(mut session: ChatSession, prompt: &str, attach: &[PathBuf]) -> anyhow::Result<()> {
    let mut turn = Turn::new(prompt);
    for path in attach {
        turn = turn.attach(Attachment::from_path(path).await?);
    }

    match session.send(turn, print_fragment).await {
        Ok(reply) => {
            println!();
            log::info!("usage: {}", format_usage(&reply.usage));
            Ok(())
        }
        Err(err) => {
            print_failure(&err);
            Err(err.into())
        }
    }
}
