//! Explorer runtime: executes expansion requests for a [`NavigationStore`].
//!
//! The explorer owns the store on one thread. Each issued request runs on a
//! short-lived worker thread that calls the [`ExpansionService`] and sends
//! the outcome back over a channel. Outcomes are applied only when the owner
//! calls [`Explorer::pump`], [`Explorer::wait_next`] or [`Explorer::settle`],
//! so the store has a single writer and snapshot reads never race an update.
//!
//! Superseded requests are not aborted. Their outcomes still arrive and the
//! store discards them.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use ideaspace_layout::{DEFAULT_RADIUS, LayoutError, SphereLayout};
use tracing::{debug, debug_span, warn};
use web_time::Instant;

use crate::error::{ExpansionError, Result};
use crate::label::DEFAULT_LABEL_WIDTH;
use crate::feed::Subscription;
use crate::service::{
    ExpansionOutcome, ExpansionRequest, ExpansionService, PrewarmSink, RequestSeq,
};
use crate::store::{ApplyOutcome, NavigationStore, Phase, Snapshot};

/// Explorer tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Radius of the neighbor shell.
    pub radius: f64,
    /// Column budget for node captions in text views.
    pub label_width: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl ExplorerConfig {
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    /// Build the layout this config describes.
    pub fn layout(&self) -> std::result::Result<SphereLayout, LayoutError> {
        SphereLayout::new(self.radius)
    }
}

/// Drives a navigation store against an expansion service.
pub struct Explorer {
    store: NavigationStore,
    config: ExplorerConfig,
    service: Arc<dyn ExpansionService>,
    prewarm: Option<Arc<dyn PrewarmSink>>,
    sender: Sender<ExpansionOutcome>,
    receiver: Receiver<ExpansionOutcome>,
    in_flight: usize,
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("prewarm", &self.prewarm.is_some())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Explorer {
    /// Create an explorer with a fresh store.
    pub fn new(
        config: ExplorerConfig,
        service: Arc<dyn ExpansionService>,
    ) -> std::result::Result<Self, LayoutError> {
        let store = NavigationStore::new(config.layout()?);
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            store,
            config,
            service,
            prewarm: None,
            sender,
            receiver,
            in_flight: 0,
        })
    }

    /// Notify `sink` with the focus and its neighbors after each applied expansion.
    #[must_use]
    pub fn with_prewarm(mut self, sink: Arc<dyn PrewarmSink>) -> Self {
        self.prewarm = Some(sink);
        self
    }

    /// Start exploring from a seed. See [`NavigationStore::submit_seed`].
    pub fn submit_seed(&mut self, sentence: &str) -> Result<RequestSeq> {
        let request = self.store.submit_seed(sentence)?;
        Ok(self.dispatch(request))
    }

    /// Re-center on a node. `Ok(None)` means the node already is the focus.
    pub fn select_node(&mut self, label: &str) -> Result<Option<RequestSeq>> {
        Ok(self
            .store
            .select_node(label)?
            .map(|request| self.dispatch(request)))
    }

    /// Focus `sentence` unconditionally. See [`NavigationStore::set_focus`].
    pub fn set_focus(&mut self, sentence: &str) -> Result<RequestSeq> {
        let request = self.store.set_focus(sentence)?;
        Ok(self.dispatch(request))
    }

    /// Apply every outcome that has already arrived, without blocking.
    pub fn pump(&mut self) -> Vec<ApplyOutcome> {
        let mut applied = Vec::new();
        while let Ok(outcome) = self.receiver.try_recv() {
            applied.push(self.receive(outcome));
        }
        applied
    }

    /// Block up to `timeout` for the next outcome and apply it.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<ApplyOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Some(self.receive(outcome)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Apply outcomes until the store leaves `Loading` or `timeout` elapses.
    ///
    /// Returns `true` if the store settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.store.phase() == Phase::Loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.wait_next(remaining).is_none() {
                return self.store.phase() != Phase::Loading;
            }
        }
        true
    }

    #[must_use]
    pub fn store(&self) -> &NavigationStore {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// See [`NavigationStore::subscribe`].
    pub fn subscribe(&self, callback: impl Fn(&Snapshot) + 'static) -> Subscription {
        self.store.subscribe(callback)
    }

    /// Requests dispatched whose outcome has not been received yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn dispatch(&mut self, request: ExpansionRequest) -> RequestSeq {
        let seq = request.seq;
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        // Kept so a failed spawn can still resolve the request.
        let fallback = request.clone();

        let spawned = thread::Builder::new()
            .name(format!("ideaspace-expand-{}", seq.get()))
            .spawn(move || {
                let _span = debug_span!(
                    "expansion.request",
                    seq = request.seq.get(),
                    duration_ms = tracing::field::Empty
                )
                .entered();
                let start = Instant::now();
                let result = service.expand(&request.sentence);
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                tracing::Span::current().record("duration_ms", duration_ms);
                debug!(
                    target: "ideaspace.explorer",
                    seq = request.seq.get(),
                    ok = result.is_ok(),
                    duration_ms,
                    "expansion finished"
                );
                // The explorer may be gone; nothing is waiting then.
                let _ = sender.send(request.resolve(result));
            });

        self.in_flight += 1;
        if let Err(error) = spawned {
            warn!(target: "ideaspace.explorer", seq = seq.get(), %error, "failed to spawn expansion worker");
            let _ = self.sender.send(fallback.resolve(Err(ExpansionError::unavailable(
                format!("could not start request: {error}"),
            ))));
        }
        seq
    }

    fn receive(&mut self, outcome: ExpansionOutcome) -> ApplyOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let applied = self.store.apply(outcome);
        if applied.is_applied() {
            self.notify_prewarm();
        }
        applied
    }

    fn notify_prewarm(&self) {
        let Some(sink) = self.prewarm.as_ref().map(Arc::clone) else {
            return;
        };
        let state = self.store.state();
        let mut sentences: Vec<String> = state.focus().map(str::to_owned).into_iter().collect();
        sentences.extend(state.neighbors().iter().map(|n| n.label().to_owned()));

        let spawned = thread::Builder::new()
            .name("ideaspace-prewarm".to_string())
            .spawn(move || {
                if let Err(error) = sink.prewarm(&sentences) {
                    debug!(target: "ideaspace.explorer", %error, "prewarm failed");
                }
            });
        if let Err(error) = spawned {
            debug!(target: "ideaspace.explorer", %error, "prewarm skipped");
        }
    }
}
