//! Error types for the Roster client.

use roster_core::RosterError;
use thiserror::Error;

/// Errors that can occur when talking to the user service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The requested user does not exist
    #[error("User not found: {0}")]
    NotFound(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Client settings that cannot be turned into requests
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline, unreachable, or timed out
    #[error("Server unreachable: {0}")]
    Unreachable(String),
}

impl ClientError {
    /// Classify a send failure: connect and timeout errors mean the server
    /// never answered.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ClientError::Unreachable(err.to_string())
        } else {
            ClientError::Request(err)
        }
    }
}

impl From<ClientError> for RosterError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ServerError { status, message } => RosterError::Server { status, message },
            ClientError::NotFound(id) => RosterError::not_found("user", id),
            ClientError::InvalidUrl(msg) | ClientError::InvalidConfig(msg) => {
                RosterError::InvalidInput(msg)
            }
            ClientError::Request(_) | ClientError::ParseError(_) | ClientError::Unreachable(_) => {
                RosterError::Transport(err.to_string())
            }
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
