//! Interactive exploration loop.
//!
//! Input lines arrive on a channel fed by a reader thread, so a new focus
//! can be requested while an expansion is still loading. The loop polls
//! that channel and the explorer's outcome channel alternately and redraws
//! when the store version moves.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use ideaspace_core::{Explorer, NavError};
use tracing::debug;

use crate::error::Result;
use crate::view::TextView;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

const HELP: &str = "\
commands:
  <number>     re-center on the numbered neighbor
  <sentence>   seed the exploration, or jump to a new focus
               (a number with no matching neighbor is a sentence too)
  :history     list every sentence explored so far
  :help        show this help
  :q           quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    History,
    Help,
    /// Looks like a 1-based neighbor index. Falls back to text when no
    /// neighbor has that number.
    Pick(usize),
    Text(String),
    Empty,
}

#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        ":q" | ":quit" | ":exit" => Command::Quit,
        ":history" | ":h" => Command::History,
        ":help" | ":?" => Command::Help,
        _ => match line.parse::<usize>() {
            Ok(index) => Command::Pick(index),
            Err(_) => Command::Text(line.to_string()),
        },
    }
}

/// Forward lines from `reader` until EOF or a read error.
pub fn spawn_line_reader<R>(reader: R) -> Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("ideaspace-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(error) = spawned {
        debug!(target: "ideaspace.cli", %error, "input thread failed to start");
    }
    receiver
}

pub struct Session<W: Write> {
    explorer: Explorer,
    view: TextView,
    out: W,
    /// How long to wait for in-flight work once input ends.
    drain_timeout: Duration,
}

impl<W: Write> Session<W> {
    pub fn new(explorer: Explorer, out: W, drain_timeout: Duration) -> Self {
        let view = TextView::new(explorer.config().label_width);
        Self {
            explorer,
            view,
            out,
            drain_timeout,
        }
    }

    #[must_use]
    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `:q` or until `lines` closes.
    pub fn run(&mut self, lines: &Receiver<String>) -> Result<()> {
        self.redraw()?;
        loop {
            self.explorer.pump();
            self.redraw()?;
            match lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => {
                    if !self.handle(&line)? {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.explorer.settle(self.drain_timeout);
                    self.redraw()?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Execute one input line. Returns `false` when the session should end.
    pub fn handle(&mut self, line: &str) -> Result<bool> {
        let result = match parse_command(line) {
            Command::Quit => return Ok(false),
            Command::Empty => return Ok(true),
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(true);
            }
            Command::History => {
                self.view
                    .render_history(&mut self.out, self.explorer.store().history())?;
                return Ok(true);
            }
            Command::Pick(index) => match self.neighbor_label(index) {
                Some(label) => self.explorer.select_node(&label).map(drop),
                None => self.focus_text(line.trim()),
            },
            Command::Text(text) => self.focus_text(&text),
        };
        if let Err(error) = result {
            writeln!(self.out, "error: {error}")?;
        }
        Ok(true)
    }

    fn neighbor_label(&self, index: usize) -> Option<String> {
        let neighbors = self.explorer.store().state().neighbors();
        let node = neighbors.get(index.checked_sub(1)?)?;
        Some(node.label().to_string())
    }

    /// Seed before the first focus, otherwise re-center. Text naming the
    /// focus (or the sentence already loading) issues no request.
    fn focus_text(&mut self, text: &str) -> std::result::Result<(), NavError> {
        let store = self.explorer.store();
        if store.state().focus().is_some() {
            return self.explorer.select_node(text).map(drop);
        }
        if store.pending().is_some_and(|request| request.sentence == text) {
            return Ok(());
        }
        self.explorer.submit_seed(text).map(drop)
    }

    fn redraw(&mut self) -> Result<()> {
        let version = self.explorer.store().version();
        let snapshot = self.explorer.snapshot();
        self.view.refresh(&mut self.out, version, &snapshot)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ideaspace_core::{ExpansionError, ExplorerConfig, Phase};

    use super::*;

    fn counting_session() -> (Session<Vec<u8>>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let service = move |sentence: &str| -> std::result::Result<Vec<String>, ExpansionError> {
            counter.fetch_add(1, Ordering::SeqCst);
            if sentence == "offline" {
                return Err(ExpansionError::unavailable("connection refused"));
            }
            Ok(vec![format!("{sentence} one"), format!("{sentence} two")])
        };
        let explorer = Explorer::new(ExplorerConfig::default(), Arc::new(service)).unwrap();
        (
            Session::new(explorer, Vec::new(), Duration::from_secs(5)),
            calls,
        )
    }

    fn session() -> Session<Vec<u8>> {
        counting_session().0
    }

    fn run_script(lines: &[&str]) -> Session<Vec<u8>> {
        let (sender, receiver) = mpsc::channel();
        for line in lines {
            sender.send((*line).to_string()).unwrap();
        }
        drop(sender);
        let mut session = session();
        session.run(&receiver).unwrap();
        session
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(parse_command("  :q "), Command::Quit);
        assert_eq!(parse_command(":history"), Command::History);
        assert_eq!(parse_command("3"), Command::Pick(3));
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(
            parse_command(" the sea "),
            Command::Text("the sea".to_string())
        );
        assert_eq!(parse_command("-1"), Command::Text("-1".to_string()));
    }

    #[test]
    fn seed_then_eof_drains_to_ready() {
        let session = run_script(&["sea"]);
        let snapshot = session.explorer().snapshot();
        assert_eq!(snapshot.phase, Phase::Ready);
        assert_eq!(snapshot.focus_label.as_deref(), Some("sea"));

        let text = output(session);
        assert!(text.contains("no focus yet"));
        assert!(text.contains("focus: sea"));
        assert!(text.contains(" 1. sea one"));
    }

    #[test]
    fn pick_by_number_recenters() {
        let mut session = session();
        session.handle("sea").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        session.handle("2").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));

        let store = session.explorer().store();
        assert_eq!(store.state().focus(), Some("sea two"));
        assert_eq!(store.history(), ["sea", "sea two"]);
    }

    #[test]
    fn number_without_neighbor_is_a_sentence() {
        let mut session = session();
        session.handle("sea").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        assert!(session.handle("7").unwrap());
        assert!(session.explorer.settle(Duration::from_secs(5)));
        assert_eq!(session.explorer().store().history(), ["sea", "7"]);
        assert_eq!(session.explorer().store().state().focus(), Some("7"));
    }

    #[test]
    fn numeric_seed_starts_exploration() {
        let mut session = session();
        session.handle("1984").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        assert_eq!(session.explorer().store().history(), ["1984"]);
        assert_eq!(session.explorer().store().state().focus(), Some("1984"));
    }

    #[test]
    fn retyping_focus_issues_no_request() {
        let (mut session, calls) = counting_session();
        session.handle("sea").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        let version = session.explorer().store().version();

        session.handle(" sea ").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.explorer().store().history(), ["sea"]);
        assert_eq!(session.explorer().store().version(), version);
    }

    #[test]
    fn retyping_loading_seed_issues_no_request() {
        let (mut session, calls) = counting_session();
        session.handle("sea").unwrap();
        session.handle("sea").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.explorer().store().history(), ["sea"]);
    }

    #[test]
    fn free_text_after_focus_jumps() {
        let mut session = session();
        session.handle("sea").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        session.handle("mountains").unwrap();
        assert!(session.explorer.settle(Duration::from_secs(5)));
        assert_eq!(session.explorer().store().state().focus(), Some("mountains"));
    }

    #[test]
    fn history_command_lists_sentences() {
        let session = run_script(&["sea", ":history", ":q"]);
        assert!(output(session).contains("   1. sea\n"));
    }

    #[test]
    fn quit_stops_before_later_lines() {
        let session = run_script(&[":q", "sea"]);
        assert!(session.explorer().store().history().is_empty());
    }

    #[test]
    fn service_failure_is_displayed() {
        let session = run_script(&["offline"]);
        assert_eq!(session.explorer().snapshot().phase, Phase::Idle);
        assert!(output(session).contains("error: expansion service unavailable: connection refused"));
    }

    #[test]
    fn line_reader_forwards_until_eof() {
        let receiver = spawn_line_reader(std::io::Cursor::new(b"sea\n:q\n".to_vec()));
        let lines: Vec<String> = receiver.iter().collect();
        assert_eq!(lines, ["sea", ":q"]);
    }
}
