//! Interactive read-eval loop around a `Session`.

use std::future::Future;
use std::io::{self, Write};

use memchat_ai::{AiError, Session};
use memchat_common::MemchatError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use crate::commands::{Command, HELP};

const PROMPT: &str = "\nYou: ";

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Repl<'a> {
    session: &'a Session,
    /// Characters of each turn shown by `history`.
    preview_len: usize,
}

impl<'a> Repl<'a> {
    pub fn new(session: &'a Session, preview_len: usize) -> Self {
        Self {
            session,
            preview_len,
        }
    }

    /// Read lines until `quit`, Ctrl-C or Ctrl-D.
    pub async fn run(&self) -> memchat_common::Result<()> {
        let mut editor = DefaultEditor::new().map_err(|e| MemchatError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();

        writeln!(
            stdout,
            "Chatting with {}. Type 'help' for commands, 'quit' to exit.",
            self.session.model()
        )?;
        writeln!(stdout, "{}", "=".repeat(50))?;

        loop {
            let line = match editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    writeln!(stdout, "\nInterrupted, exiting...")?;
                    break;
                }
                Err(e) => return Err(MemchatError::Terminal(e.to_string())),
            };

            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    debug!("failed to record input history: {e}");
                }
            }

            let command = Command::parse(&line);
            match until_interrupted(self.dispatch(command, &mut stdout), tokio::signal::ctrl_c()).await {
                Some(flow) => {
                    if flow? == Flow::Exit {
                        break;
                    }
                }
                None => {
                    warn!("command interrupted by user");
                    writeln!(stdout, "\n\nInterrupted, exiting...")?;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Execute one command, writing all user-facing output to `out`.
    pub async fn dispatch(&self, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            Command::Empty => writeln!(out, "Please enter something.")?,
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::History => self.print_history(out)?,
            Command::Clear => match self.session.clear() {
                Ok(()) => writeln!(out, "Conversation cleared.")?,
                Err(e) => report(out, &e)?,
            },
            Command::Save(path) => match self.session.save_to_file(path.as_deref()).await {
                Ok(path) => writeln!(out, "Saved conversation to {}", path.display())?,
                Err(e) => report(out, &e)?,
            },
            Command::Load(None) => writeln!(out, "Usage: load <file>")?,
            Command::Load(Some(path)) => match self.session.load_from_file(&path).await {
                Ok(count) => writeln!(out, "Loaded {count} messages from {}", path.display())?,
                Err(e) => report(out, &e)?,
            },
            Command::Message(text) => return stream_reply(self.session, &text, out).await,
        }
        Ok(Flow::Continue)
    }

    fn print_history(&self, out: &mut impl Write) -> io::Result<()> {
        let lines = self.session.render_history(self.preview_len);
        if lines.is_empty() {
            return writeln!(out, "No conversation yet.");
        }
        writeln!(out, "=== Conversation ===")?;
        for line in lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{}", "=".repeat(20))
    }
}

/// Run `work` unless `interrupt` resolves first, in which case `work` is
/// dropped.
///
/// Once `ctrl_c()` has been polled the process no longer dies on SIGINT, so
/// every command is raced against it, not just streamed replies.
async fn until_interrupted<T>(work: impl Future<Output = T>, interrupt: impl Future) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        _ = interrupt => None,
    }
}

/// Send `text` and print the reply as it streams in.
///
/// Dropping this future aborts the request; the unanswered user turn stays in
/// the transcript.
async fn stream_reply(session: &Session, text: &str, out: &mut impl Write) -> io::Result<Flow> {
    write!(out, "Assistant: ")?;
    out.flush()?;

    let result = session
        .send(text, |fragment| {
            // A closed stdout is not worth aborting the reply for
            let _ = out.write_all(fragment.as_bytes());
            let _ = out.flush();
        })
        .await;

    writeln!(out)?;
    if let Err(e) = result {
        report(out, &e)?;
    }
    Ok(Flow::Continue)
}

fn report(out: &mut impl Write, err: &AiError) -> io::Result<()> {
    writeln!(out, "Error: {err}")?;
    match err {
        AiError::StreamInterrupted { partial, .. } if !partial.is_empty() => {
            writeln!(
                out,
                "The partial reply ({} characters) was not added to the conversation.",
                partial.chars().count()
            )?;
        }
        AiError::Endpoint(_) | AiError::StreamInterrupted { .. } => {
            writeln!(out, "Your message is kept; type a follow-up or 'clear' to start over.")?;
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use memchat_ai::{OpenAiClient, OpenAiConfig};

    fn session() -> Session {
        // Never contacted: these tests only exercise local commands.
        let config = OpenAiConfig::new("http://127.0.0.1:9/v1", "unused");
        Session::new(OpenAiClient::new(config).unwrap())
    }

    async fn run(repl: &Repl<'_>, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = repl.dispatch(Command::parse(line), &mut out).await.unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn quit_exits_and_empty_reprompts() {
        let session = session();
        let repl = Repl::new(&session, 100);

        let (flow, text) = run(&repl, "   ").await;
        assert_eq!(flow, Flow::Continue);
        assert!(text.contains("Please enter something"));

        let (flow, text) = run(&repl, "quit").await;
        assert_eq!(flow, Flow::Exit);
        assert!(text.contains("Goodbye"));
    }

    #[tokio::test]
    async fn history_lists_truncated_turns() {
        let session = session();
        let repl = Repl::new(&session, 5);

        let (_, text) = run(&repl, "history").await;
        assert!(text.contains("No conversation yet."));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(
            &path,
            r#"{"timestamp":"2025-01-01T00:00:00Z","history":[
                {"role":"user","content":"hello there"},
                {"role":"assistant","content":"hi"}]}"#,
        )
        .unwrap();
        let (_, text) = run(&repl, &format!("load {}", path.display())).await;
        assert!(text.contains("Loaded 2 messages"));

        let (_, text) = run(&repl, "history").await;
        assert!(text.contains("1. You: hello..."));
        assert!(text.contains("2. Assistant: hi"));
    }

    #[tokio::test]
    async fn save_clear_and_load_cycle() {
        let session = session();
        let repl = Repl::new(&session, 100);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");

        let (_, text) = run(&repl, &format!("save {}", path.display())).await;
        assert!(text.contains("Saved conversation to"));
        assert!(path.exists());

        let (_, text) = run(&repl, "clear").await;
        assert!(text.contains("Conversation cleared."));
        assert!(session.history().is_empty());

        let (_, text) = run(&repl, &format!("load {}", path.display())).await;
        assert!(text.contains("Loaded 0 messages"));
    }

    #[tokio::test]
    async fn load_errors_are_reported_not_fatal() {
        let session = session();
        let repl = Repl::new(&session, 100);

        let (flow, text) = run(&repl, "load").await;
        assert_eq!(flow, Flow::Continue);
        assert!(text.contains("Usage: load <file>"));

        let (flow, text) = run(&repl, "load /tmp/memchat_missing_transcript.json").await;
        assert_eq!(flow, Flow::Continue);
        assert!(text.contains("file not found"));

        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"timestamp":"x"}"#).unwrap();
        let (_, text) = run(&repl, &format!("load {}", bad.display())).await;
        assert!(text.contains("format error"));
    }

    #[tokio::test]
    async fn interrupt_drops_pending_work() {
        let interrupted = until_interrupted(std::future::pending::<Flow>(), async {}).await;
        assert_eq!(interrupted, None);

        let finished = until_interrupted(async { Flow::Continue }, std::future::pending::<()>()).await;
        assert_eq!(finished, Some(Flow::Continue));
    }

    #[test]
    fn report_explains_discarded_partial_reply() {
        let mut out = Vec::new();
        let err = AiError::StreamInterrupted {
            partial: "abc".into(),
            reason: "reset".into(),
        };
        report(&mut out, &err).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error: stream interrupted: reset"));
        assert!(text.contains("3 characters"));
    }
}
