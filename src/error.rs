//! Error type returned by [`RequestService::send_request`](crate::service::RequestService::send_request).
//!
//! Each stage of a send has its own error type; this enum wraps them so
//! callers can tell which stage failed.

use crate::assembler::ConstructionError;
use crate::executor::TransportError;
use crate::formatter::{FormatError, PathError};
use crate::store::StoreError;
use std::fmt;

/// Which kind of stored entity was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Request,
    Environment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Request => write!(f, "Request"),
            EntityKind::Environment => write!(f, "Environment"),
        }
    }
}

/// Errors that can occur while sending a stored request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The request or environment id is unknown to its store.
    NotFound { kind: EntityKind, id: String },

    /// The resolved request could not be turned into a valid HTTP request.
    Construction(ConstructionError),

    /// The request failed on the wire.
    Transport(TransportError),

    /// The response body could not be formatted.
    Format(FormatError),

    /// A post-request extraction could not be evaluated.
    Path(PathError),

    /// A post-request action updated the environment but it could not be
    /// saved. The response is discarded.
    EffectPersist(StoreError),
}

impl SendError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        SendError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::NotFound { kind, id } => write!(f, "{} '{}' not found", kind, id),
            SendError::Construction(e) => write!(f, "{}", e),
            SendError::Transport(e) => write!(f, "{}", e),
            SendError::Format(e) => write!(f, "{}", e),
            SendError::Path(e) => write!(f, "{}", e),
            SendError::EffectPersist(e) => {
                write!(f, "Failed to save environment after request: {}", e)
            }
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SendError::NotFound { .. } => None,
            SendError::Construction(e) => Some(e),
            SendError::Transport(e) => Some(e),
            SendError::Format(e) => Some(e),
            SendError::Path(e) => Some(e),
            SendError::EffectPersist(e) => Some(e),
        }
    }
}

impl From<ConstructionError> for SendError {
    fn from(err: ConstructionError) -> Self {
        SendError::Construction(err)
    }
}

impl From<TransportError> for SendError {
    fn from(err: TransportError) -> Self {
        SendError::Transport(err)
    }
}

impl From<FormatError> for SendError {
    fn from(err: FormatError) -> Self {
        SendError::Format(err)
    }
}

impl From<PathError> for SendError {
    fn from(err: PathError) -> Self {
        SendError::Path(err)
    }
}

impl From<StoreError> for SendError {
    fn from(err: StoreError) -> Self {
        SendError::EffectPersist(err)
    }
}
