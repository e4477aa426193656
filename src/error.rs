#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Transport and decode failures are both rendered as connection errors.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Decode(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_decode_are_connection_errors() {
        assert!(AppError::Transport("refused".into()).is_connection_error());
        assert!(AppError::Decode("eof".into()).is_connection_error());
        assert!(!AppError::validation("Please enter a URL").is_connection_error());
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = AppError::validation("Please enter a topic");
        assert_eq!(err.to_string(), "Please enter a topic");
    }
}
