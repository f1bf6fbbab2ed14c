#![forbid(unsafe_code)]

//! ideaspace core
//!
//! Exploration engine for a 3D graph of short text ideas. A user starts from
//! a seed sentence, the expansion service returns related ideas, and those
//! are laid out on a sphere around the focus. Selecting any idea re-centers
//! on it.
//!
//! # Key Components
//!
//! - [`NavigationStore`] - sans-I/O state machine (`Idle` / `Loading` / `Ready`)
//!   with last-request-wins sequencing
//! - [`Explorer`] - runs expansion requests on worker threads and applies
//!   their outcomes on the owning thread
//! - [`ExpansionService`] / [`PrewarmSink`] - the external service seam
//! - [`Snapshot`] / [`Subscription`] - immutable render-side state, polled
//!   by version or pushed to listeners
//! - [`display_label`] - caption truncation for views
//!
//! # Example
//!
//! ```
//! use ideaspace_core::{NavigationStore, Phase};
//!
//! let mut store = NavigationStore::default();
//! let request = store.submit_seed("the sea at night").unwrap();
//! let ideas = vec!["bioluminescence".to_string(), "tides".to_string()];
//! store.apply(request.resolve(Ok(ideas)));
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.phase, Phase::Ready);
//! assert_eq!(snapshot.neighbors.len(), 2);
//! ```

pub mod error;
pub mod explorer;
mod feed;
pub mod label;
pub mod node;
pub mod service;
pub mod store;

pub use error::{ExpansionError, NavError, Result};
pub use explorer::{Explorer, ExplorerConfig};
pub use ideaspace_layout::{DEFAULT_RADIUS, LayoutError, SphereLayout, Vec3};
pub use label::{DEFAULT_LABEL_WIDTH, display_label};
pub use node::{ExplorationState, IdeaNode};
pub use feed::Subscription;
pub use service::{
    ExpansionOutcome, ExpansionRequest, ExpansionService, PrewarmSink, RequestSeq,
};
pub use store::{ApplyOutcome, NavigationStore, Phase, Snapshot};
