use crate::types::CapabilityName;
use thiserror::Error;

/// Failure reported by the host platform, message passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(CapabilityName),

    #[error("Host query failed: {0}")]
    HostQuery(String),

    #[error("Host operation failed: {0}")]
    HostOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GateError {
    pub fn host_query(err: HostError) -> Self {
        GateError::HostQuery(err.message)
    }

    pub fn host_operation(err: HostError) -> Self {
        GateError::HostOperation(err.message)
    }

    /// Host-reported message, if this failure came from the host.
    pub fn host_message(&self) -> Option<&str> {
        match self {
            GateError::HostQuery(msg) | GateError::HostOperation(msg) => Some(msg),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
