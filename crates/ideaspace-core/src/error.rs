use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

/// Failure reported by an [`ExpansionService`](crate::ExpansionService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// Transport failure, timeout, or a non-success status.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The body did not carry a usable `nodes` list.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ExpansionError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Errors surfaced at the navigation store boundary.
///
/// None of these are fatal: the store stays usable after every one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("{action} rejected: {reason}")]
    InvalidTransition {
        action: &'static str,
        reason: &'static str,
    },

    #[error("expansion service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("malformed expansion response: {0}")]
    MalformedResponse(String),
}

impl From<ExpansionError> for NavError {
    fn from(error: ExpansionError) -> Self {
        match error {
            ExpansionError::Unavailable(message) => Self::ServiceUnavailable(message),
            ExpansionError::Malformed(message) => Self::MalformedResponse(message),
        }
    }
}
