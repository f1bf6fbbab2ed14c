//! Navigation store: the exploration state machine.
//!
//! ```text
//!   Idle ──set_focus──▶ Loading ──apply(ok)──▶ Ready
//!    ▲                   │  ▲                    │
//!    └──apply(err)───────┘  └─────set_focus──────┘
//!        (no focus yet)         apply(err) returns to Ready
//! ```
//!
//! The store is sans-I/O. [`NavigationStore::set_focus`] returns the
//! [`ExpansionRequest`] the caller must execute; the answer comes back
//! through [`NavigationStore::apply`]. Every issued request carries a
//! sequence number and only the most recently issued one may change the
//! exploration state (last-request-wins). Focus and neighbors are committed
//! together when that response succeeds, so a snapshot never pairs a focus
//! with another focus's neighbors.

use ideaspace_layout::{SphereLayout, Vec3};
use serde::Serialize;
use tracing::{debug, debug_span, info, warn};

use crate::error::{NavError, Result};
use crate::node::{ExplorationState, IdeaNode};
use crate::feed::{SnapshotFeed, Subscription};
use crate::service::{ExpansionOutcome, ExpansionRequest, RequestSeq};

/// Coarse phase of the exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing explored yet.
    #[default]
    Idle,
    /// An expansion request is in flight.
    Loading,
    /// Neighbors of the current focus are shown.
    Ready,
}

/// Immutable render-side view of the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub focus_label: Option<String>,
    /// Always the origin; neighbors are placed around it.
    pub focus_position: Vec3,
    pub neighbors: Vec<IdeaNode>,
    /// Sentence being expanded while `phase == Loading`.
    pub pending: Option<String>,
    /// Displayable message for the last failed expansion.
    pub error: Option<String>,
}

/// What [`NavigationStore::apply`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Focus moved and neighbors were replaced.
    Applied { neighbors: usize },
    /// The latest request failed; state stayed at the previous snapshot.
    Failed(NavError),
    /// A newer request exists (or this one was already applied); ignored.
    Superseded { seq: RequestSeq, latest: RequestSeq },
}

impl ApplyOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

/// Owns the exploration state for one session.
#[derive(Debug)]
pub struct NavigationStore {
    state: ExplorationState,
    layout: SphereLayout,
    phase: Phase,
    last_issued: u64,
    pending: Option<ExpansionRequest>,
    last_error: Option<NavError>,
    feed: SnapshotFeed,
}

impl Default for NavigationStore {
    fn default() -> Self {
        Self::new(SphereLayout::default())
    }
}

impl NavigationStore {
    #[must_use]
    pub fn new(layout: SphereLayout) -> Self {
        Self {
            state: ExplorationState::default(),
            layout,
            phase: Phase::Idle,
            last_issued: 0,
            pending: None,
            last_error: None,
            feed: SnapshotFeed::new(),
        }
    }

    /// Begin exploring `sentence`.
    ///
    /// Records it in history and returns the one request to execute. A blank
    /// sentence is rejected with [`NavError::InvalidInput`] and nothing changes.
    pub fn set_focus(&mut self, sentence: &str) -> Result<ExpansionRequest> {
        let sentence = validate_sentence(sentence)?;

        self.last_issued += 1;
        let request = ExpansionRequest {
            seq: RequestSeq(self.last_issued),
            sentence: sentence.to_owned(),
        };
        if let Some(previous) = &self.pending {
            debug!(
                target: "ideaspace.store",
                superseded = previous.seq.get(),
                by = request.seq.get(),
                "request superseded before completion"
            );
        }

        self.state.history.push(request.sentence.clone());
        self.phase = Phase::Loading;
        self.pending = Some(request.clone());
        self.last_error = None;
        info!(
            target: "ideaspace.store",
            seq = request.seq.get(),
            sentence = %request.sentence,
            "focus requested"
        );
        self.publish();
        Ok(request)
    }

    /// Start from a seed sentence. Only valid before any focus exists.
    pub fn submit_seed(&mut self, sentence: &str) -> Result<ExpansionRequest> {
        validate_sentence(sentence)?;
        if self.state.focus.is_some() {
            return Err(NavError::InvalidTransition {
                action: "submit_seed",
                reason: "exploration already has a focus",
            });
        }
        self.set_focus(sentence)
    }

    /// Re-center on a clicked node.
    ///
    /// Returns `Ok(None)` without touching state when `label` is already the
    /// focus (or the sentence currently being loaded).
    pub fn select_node(&mut self, label: &str) -> Result<Option<ExpansionRequest>> {
        let label = validate_sentence(label)?;
        if self.state.focus.is_none() {
            return Err(NavError::InvalidTransition {
                action: "select_node",
                reason: "no focus to navigate from",
            });
        }
        if self.target() == Some(label) {
            debug!(target: "ideaspace.store", label, "selected node is already the focus");
            return Ok(None);
        }
        self.set_focus(label).map(Some)
    }

    /// Apply a finished expansion.
    ///
    /// Only the outcome of the latest issued request changes state; anything
    /// older is dropped and reported as [`ApplyOutcome::Superseded`].
    pub fn apply(&mut self, outcome: ExpansionOutcome) -> ApplyOutcome {
        let _span = debug_span!("store.apply", seq = outcome.seq.get()).entered();
        let latest = RequestSeq(self.last_issued);

        let request = match self.pending.take() {
            Some(request) if request.seq == outcome.seq => request,
            other => {
                self.pending = other;
                debug!(
                    target: "ideaspace.store",
                    seq = outcome.seq.get(),
                    latest = latest.get(),
                    "discarding superseded response"
                );
                return ApplyOutcome::Superseded {
                    seq: outcome.seq,
                    latest,
                };
            }
        };

        match outcome.result {
            Ok(ideas) => {
                let neighbors = self.place(ideas);
                let count = neighbors.len();
                self.state.focus = Some(request.sentence);
                self.state.neighbors = neighbors;
                self.phase = Phase::Ready;
                self.last_error = None;
                info!(
                    target: "ideaspace.store",
                    seq = request.seq.get(),
                    neighbors = count,
                    "focus applied"
                );
                self.publish();
                ApplyOutcome::Applied { neighbors: count }
            }
            Err(error) => {
                let error = NavError::from(error);
                self.phase = if self.state.focus.is_some() {
                    Phase::Ready
                } else {
                    Phase::Idle
                };
                warn!(
                    target: "ideaspace.store",
                    seq = request.seq.get(),
                    sentence = %request.sentence,
                    %error,
                    "expansion failed"
                );
                self.last_error = Some(error.clone());
                self.publish();
                ApplyOutcome::Failed(error)
            }
        }
    }

    /// Current snapshot. Never blocks.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.feed.current().clone()
    }

    /// Incremented on every snapshot change; poll it to decide when to redraw.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.feed.version()
    }

    /// Call `callback` with every new snapshot while the guard lives.
    pub fn subscribe(&self, callback: impl Fn(&Snapshot) + 'static) -> Subscription {
        self.feed.subscribe(callback)
    }

    #[must_use]
    pub fn state(&self) -> &ExplorationState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        self.state.history()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The request whose response is still awaited, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&ExpansionRequest> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&NavError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn layout(&self) -> &SphereLayout {
        &self.layout
    }

    /// The sentence the user is heading to: the pending one, else the focus.
    fn target(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|p| p.sentence.as_str())
            .or(self.state.focus.as_deref())
    }

    fn place(&self, ideas: Vec<String>) -> Vec<IdeaNode> {
        let labels: Vec<String> = ideas
            .into_iter()
            .filter(|idea| !idea.trim().is_empty())
            .collect();
        let total = labels.len();
        labels
            .into_iter()
            .enumerate()
            .filter_map(|(i, label)| IdeaNode::new(label, self.layout.position(i, total)))
            .collect()
    }

    fn publish(&mut self) {
        let snapshot = Snapshot {
            phase: self.phase,
            focus_label: self.state.focus.clone(),
            focus_position: Vec3::ORIGIN,
            neighbors: self.state.neighbors.clone(),
            pending: self.pending.as_ref().map(|p| p.sentence.clone()),
            error: self.last_error.as_ref().map(ToString::to_string),
        };
        self.feed.publish(snapshot);
    }
}

fn validate_sentence(sentence: &str) -> Result<&str> {
    let trimmed = sentence.trim();
    if trimmed.is_empty() {
        return Err(NavError::InvalidInput {
            reason: "sentence is blank",
        });
    }
    Ok(trimmed)
}
