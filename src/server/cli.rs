//! Admin stdin commands (spec.md §6): `/stop`, `/save`, `/help`. Read on
//! a dedicated thread (spec.md §5) and handed to the tick thread through
//! a channel; parsing is kept separate from I/O so it can be tested
//! without a real stdin.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stop,
    Save,
    Help,
    Unknown(String),
}

pub const HELP_TEXT: &str = "\
Available commands:
  /stop   graceful shutdown (save + exit 0)
  /save   force save, print chunks written
  /help   show this message";

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/stop" => Command::Stop,
            "/save" => Command::Save,
            "/help" => Command::Help,
            other => Command::Unknown(other.to_owned()),
        }
    }
}
