use engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    /// A setting that loaded but does not hold a usable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Failure of a single user action against the remote API.
///
/// None of these are retried: the action has to be submitted again.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected input, either locally before sending or by the server (400/422).
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("local state error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Message shown to the user, falling back to `fallback` when the server
    /// gave no explanation.
    pub fn user_message(&self, fallback: &str) -> String {
        let or_fallback = |message: &str| {
            if message.trim().is_empty() {
                fallback.to_string()
            } else {
                message.to_string()
            }
        };
        match self {
            Self::Validation(message)
            | Self::InvalidCredentials(message)
            | Self::Conflict(message)
            | Self::Server(message) => or_fallback(message),
            Self::Unauthorized => "Session expired, please log in again.".to_string(),
            Self::Forbidden | Self::NotFound => fallback.to_string(),
            Self::Transport(err) => format!("Server unreachable: {err}"),
            Self::Storage(message) => format!("{fallback}: {message}"),
        }
    }
}

impl From<EngineError> for ClientError {
    fn from(value: EngineError) -> Self {
        Self::Validation(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::Conflict("User already exists".to_string());
        assert_eq!(err.user_message("Failed"), "User already exists");
    }

    #[test]
    fn empty_message_uses_fallback() {
        let err = ClientError::Server(String::new());
        assert_eq!(err.user_message("Failed to add expense"), "Failed to add expense");
        assert_eq!(
            ClientError::NotFound.user_message("Failed to delete expense"),
            "Failed to delete expense"
        );
    }

    #[test]
    fn engine_errors_are_validation_errors() {
        let err = ClientError::from(EngineError::InvalidAmount("zero".to_string()));
        assert!(matches!(err, ClientError::Validation(message) if message == "Invalid amount: zero"));
    }
}
