//! Plain-text rendering of exploration snapshots.

use std::io::{self, Write};

use ideaspace_core::{Phase, Snapshot, display_label};

/// Redraws a snapshot only when the store version moved.
#[derive(Debug, Clone)]
pub struct TextView {
    label_width: usize,
    drawn_version: Option<u64>,
}

impl TextView {
    #[must_use]
    pub fn new(label_width: usize) -> Self {
        Self {
            label_width,
            drawn_version: None,
        }
    }

    /// Draw `snapshot` if `version` differs from the last one drawn.
    /// Returns whether anything was written.
    pub fn refresh(
        &mut self,
        out: &mut impl Write,
        version: u64,
        snapshot: &Snapshot,
    ) -> io::Result<bool> {
        if self.drawn_version == Some(version) {
            return Ok(false);
        }
        self.render(out, snapshot)?;
        self.drawn_version = Some(version);
        Ok(true)
    }

    pub fn render(&self, out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
        match snapshot.phase {
            Phase::Idle => {
                writeln!(out, "no focus yet; type a seed sentence")?;
            }
            Phase::Loading => {
                let pending = snapshot.pending.as_deref().unwrap_or_default();
                writeln!(out, "expanding \"{}\" ...", self.caption(pending))?;
            }
            Phase::Ready => {
                let focus = snapshot.focus_label.as_deref().unwrap_or_default();
                writeln!(
                    out,
                    "focus: {}  {}",
                    self.caption(focus),
                    snapshot.focus_position
                )?;
                if snapshot.neighbors.is_empty() {
                    writeln!(out, "  (no related ideas)")?;
                }
                for (index, node) in snapshot.neighbors.iter().enumerate() {
                    writeln!(
                        out,
                        "  {:>2}. {:<width$}  {}",
                        index + 1,
                        self.caption(node.label()),
                        node.position(),
                        width = self.label_width
                    )?;
                }
            }
        }
        if let Some(error) = &snapshot.error {
            writeln!(out, "error: {error}")?;
        }
        out.flush()
    }

    pub fn render_history(&self, out: &mut impl Write, history: &[String]) -> io::Result<()> {
        if history.is_empty() {
            writeln!(out, "history is empty")?;
        }
        for (index, sentence) in history.iter().enumerate() {
            writeln!(out, "  {:>2}. {}", index + 1, self.caption(sentence))?;
        }
        out.flush()
    }

    fn caption<'a>(&self, label: &'a str) -> std::borrow::Cow<'a, str> {
        display_label(label, self.label_width)
    }
}
