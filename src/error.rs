// src/error.rs
//! Fault taxonomy for collaborator calls.

use thiserror::Error;

/// Everything a collaborator call can raise. Caught at the case boundary.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Fault declared by the collaborator itself (stubs, backend error payloads).
    #[error("{0}")]
    Fault(String),
}

impl CollaboratorError {
    /// Stable name used in one-line diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TransportError",
            Self::Status { .. } => "StatusError",
            Self::Decode(_) => "DecodeError",
            Self::Fault(_) => "CollaboratorFault",
        }
    }

    pub fn fault(msg: impl Into<String>) -> Self {
        Self::Fault(msg.into())
    }
}
