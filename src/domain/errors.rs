//! Domain errors for voxdesk.
//!
//! [`ApiError`] is the single normalized failure shape produced at the network
//! boundary. Everything above the boundary (cache, mutator, CLI) only ever sees
//! this type, whatever the transport actually reported.

use thiserror::Error;

/// Normalized failure of a call against the remote agent API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never reached the server or the response never arrived.
    #[error("Network error: {0}")]
    Transport(String),

    /// The request exceeded the configured client timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("{}", describe_rejection(.status, .message, .details))]
    Rejected {
        status: u16,
        message: Option<String>,
        details: Option<String>,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

fn describe_rejection(status: &u16, message: &Option<String>, details: &Option<String>) -> String {
    match (message.as_deref(), details.as_deref()) {
        (Some(m), Some(d)) => format!("HTTP {status}: {m} ({d})"),
        (Some(m), None) => format!("HTTP {status}: {m}"),
        (None, Some(d)) => format!("HTTP {status}: {d}"),
        (None, None) => format!("HTTP {status}"),
    }
}

impl ApiError {
    /// Build a rejection from a status code and an optional message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
            details: None,
        }
    }

    /// HTTP status of a server rejection, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured details supplied by the server, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Rejected { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Domain-level errors that can occur in voxdesk.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// The underlying API failure, when this error came from the network boundary.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}
