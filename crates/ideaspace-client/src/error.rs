use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid service config: {message}")]
    InvalidConfig { message: String },
}

impl ClientError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientError;

    #[test]
    fn invalid_constructor_preserves_message() {
        let error = ClientError::invalid("base_url is empty");
        assert_eq!(
            error.to_string(),
            "invalid service config: base_url is empty"
        );
    }
}
