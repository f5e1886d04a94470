/// Core error types for Roster
use thiserror::Error;

use crate::form::FieldErrors;

/// Result type alias using `RosterError`
pub type Result<T> = std::result::Result<T, RosterError>;

/// Core error type for Roster
#[derive(Error, Debug)]
pub enum RosterError {
    /// The remote call failed before a usable response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The delete went through but reloading the list afterwards failed
    #[error("User {id} was deleted but the list could not be reloaded: {source}")]
    DeletedReloadFailed {
        id: String,
        source: Box<RosterError>,
    },

    /// Form values rejected before any request was sent
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl RosterError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error came from talking to the remote service.
    ///
    /// A 404 is a definitive answer from the server, not a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }
}

impl From<FieldErrors> for RosterError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
