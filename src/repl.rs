//! What one line typed at the calculator prompt asks for.

use tracing_subscriber::reload;

const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    ToggleDebug,
    /// Anything else goes to the calculator, trimmed.
    Evaluate(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Command<'a> {
        let line = line.trim();
        if QUIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
            Command::Quit
        } else if line.eq_ignore_ascii_case(":debug") {
            Command::ToggleDebug
        } else {
            Command::Evaluate(line)
        }
    }
}

/// The reply to `:debug`. `None` means no switch could be installed.
pub fn debug_message(toggled: Option<Result<bool, reload::Error>>) -> String {
    match toggled {
        Some(Ok(true)) => "Debug enabled".to_owned(),
        Some(Ok(false)) => "Debug disabled".to_owned(),
        Some(Err(err)) => format!("Debug unavailable: {}", err),
        None => "Debug unavailable".to_owned(),
    }
}
