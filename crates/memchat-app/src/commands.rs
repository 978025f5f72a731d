//! Interactive command parsing.

use std::path::PathBuf;

/// What one line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank input; re-prompt without touching state.
    Empty,
    Quit,
    Help,
    History,
    Clear,
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Message(String),
}

impl Command {
    /// Parse a line. The command word is case-insensitive; a line that does
    /// not fit a command's argument shape (e.g. "clear skies",
    /// "save the whales") is sent as a message.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }

        let mut words = trimmed.split_whitespace();
        let head = words.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();

        match (head.as_str(), args.as_slice()) {
            ("quit" | "exit", []) => Command::Quit,
            ("help", []) => Command::Help,
            ("history", []) => Command::History,
            ("clear", []) => Command::Clear,
            ("save", []) => Command::Save(None),
            ("save", [file]) => Command::Save(Some(PathBuf::from(file))),
            ("load", []) => Command::Load(None),
            ("load", [file]) => Command::Load(Some(PathBuf::from(file))),
            _ => Command::Message(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  history          show the conversation so far
  clear            forget the conversation (the system prompt is kept)
  save [file]      write the conversation to a JSON file
  load <file>      replace the conversation with a saved one
  help             show this message
  quit             exit
Anything else is sent to the model.";
