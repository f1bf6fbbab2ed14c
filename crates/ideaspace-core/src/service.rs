//! Contract with the remote idea-expansion service.
//!
//! The store never performs I/O itself. It issues [`ExpansionRequest`]s,
//! something executes them against an [`ExpansionService`], and the result
//! comes back as an [`ExpansionOutcome`] tagged with the request's sequence
//! number.

use std::fmt;

use crate::error::ExpansionError;

/// Monotonic id of an issued expansion request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub(crate) u64);

impl RequestSeq {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request to expand `sentence`, issued by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    pub seq: RequestSeq,
    pub sentence: String,
}

impl ExpansionRequest {
    /// Pair this request with the service's answer.
    #[must_use]
    pub fn resolve(self, result: Result<Vec<String>, ExpansionError>) -> ExpansionOutcome {
        ExpansionOutcome {
            seq: self.seq,
            sentence: self.sentence,
            result,
        }
    }
}

/// A finished expansion, ready to be applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOutcome {
    pub seq: RequestSeq,
    pub sentence: String,
    pub result: Result<Vec<String>, ExpansionError>,
}

/// Produces related ideas for a sentence.
///
/// Implementations may block; the explorer calls them off the owning thread.
pub trait ExpansionService: Send + Sync {
    /// Related ideas in display/layout order.
    fn expand(&self, sentence: &str) -> Result<Vec<String>, ExpansionError>;
}

impl<F> ExpansionService for F
where
    F: Fn(&str) -> Result<Vec<String>, ExpansionError> + Send + Sync,
{
    fn expand(&self, sentence: &str) -> Result<Vec<String>, ExpansionError> {
        self(sentence)
    }
}

/// Fire-and-forget notification that a set of sentences is about to be explored.
///
/// Used to warm embedding caches. Failures are logged and otherwise ignored;
/// they never affect navigation.
pub trait PrewarmSink: Send + Sync {
    fn prewarm(&self, sentences: &[String]) -> Result<(), ExpansionError>;
}
