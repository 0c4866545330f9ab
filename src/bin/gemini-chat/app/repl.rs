use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use gemini_chat::{
    files::Attachment,
    session::{ChatSession, Turn},
};

use super::render::{format_usage, print_failure, print_fragment};

const HELP: &str = "Commands: /attach PATH, /clear, /usage, /quit. Anything else is sent.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Attach(PathBuf),
    Clear,
    Usage,
    Quit,
    Help,
    Send(String),
    Empty,
}

fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match head {
        "/attach" if !rest.trim().is_empty() => ReplCommand::Attach(PathBuf::from(rest.trim())),
        "/clear" => ReplCommand::Clear,
        "/usage" => ReplCommand::Usage,
        "/quit" | "/exit" => ReplCommand::Quit,
        "/help" | "/attach" => ReplCommand::Help,
        _ => ReplCommand::Send(line.to_string()),
    }
}

pub async fn run(mut session: ChatSession) -> anyhow::Result<()> {
    println!("gemini-chat ({}). {HELP}", session.model());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut staged: Vec<Attachment> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Clear => {
                session.clear_pinned();
                staged.clear();
                println!("Pinned files cleared.");
            }
            ReplCommand::Usage => println!("{}", format_usage(&session.usage_totals())),
            ReplCommand::Attach(path) => match Attachment::from_path(&path).await {
                Ok(attachment) => {
                    println!("Staged {} ({})", attachment.name, attachment.mime_type);
                    staged.push(attachment);
                }
                Err(err) => eprintln!("Could not read {}: {err}", path.display()),
            },
            ReplCommand::Send(text) => {
                let turn = Turn {
                    text,
                    attachments: std::mem::take(&mut staged),
                };
                match session.send(turn, print_fragment).await {
                    Ok(_) => println!(),
                    Err(err) => print_failure(&err),
                }
            }
        }
    }
    Ok(())
}
