use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gemini-chat",
    about = "Chat with Gemini models from the terminal, with file attachments"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[arg(long, short = 'm')]
    pub model: Option<String>,
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub base_url: Option<String>,
    /// Fetch each reply in one piece instead of streaming it
    #[arg(long)]
    pub no_stream: bool,
    /// Send a single prompt and exit
    #[arg(long, short = 'p')]
    pub prompt: Option<String>,
    /// File to attach to the one-shot prompt; repeatable
    #[arg(long, short = 'a', requires = "prompt")]
    pub attach: Vec<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store the API key in the local secret store
    SetKey { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_shot_with_attachments() {
        let args = CliArgs::try_parse_from([
            "gemini-chat",
            "--prompt",
            "Summarize",
            "--attach",
            "a.pdf",
            "-a",
            "b.png",
            "--no-stream",
        ])
        .unwrap();

        assert_eq!(args.prompt.as_deref(), Some("Summarize"));
        assert_eq!(args.attach, [PathBuf::from("a.pdf"), PathBuf::from("b.png")]);
        assert!(args.no_stream);
        assert_eq!(args.command, None);
    }

    #[test]
    fn parses_set_key() {
        let args = CliArgs::try_parse_from(["gemini-chat", "set-key", "abc"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::SetKey {
                key: "abc".to_string()
            })
        );
    }

    #[test]
    fn attach_requires_prompt() {
        assert!(CliArgs::try_parse_from(["gemini-chat", "--attach", "a.pdf"]).is_err());
    }
}
