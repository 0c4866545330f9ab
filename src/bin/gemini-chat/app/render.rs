use std::io::{self, Write};

use gemini_chat::{chat::Usage, session::failure_notice, LLMError};

/// Writes a reply fragment as soon as it arrives.
pub fn print_fragment(fragment: &str) {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(fragment.as_bytes());
    let _ = stdout.flush();
}

pub fn print_failure(err: &LLMError) {
    eprintln!("\n{}", failure_notice(err));
}

pub fn format_usage(usage: &Usage) -> String {
    format!(
        "prompt {} | output {} | reasoning {} | total {}",
        usage.prompt, usage.output, usage.reasoning, usage.total
    )
}
