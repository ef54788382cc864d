//! Error types for the joind.in client.
//!
//! # Design
//! Every failure surfaces synchronously from the public method that caused
//! it; nothing is retried or swallowed. `Transport` and `HttpStatus` form the
//! request-error family: the first means no response arrived, the second
//! carries the raw status and body of a non-2xx response.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `JoindInClient` and the command executor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// A required construction option is missing or unusable.
    #[error("invalid client configuration: {0}")]
    Configuration(String),

    /// The command name is not in the endpoint table.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// The parameters do not satisfy the endpoint's declared schema.
    #[error("invalid parameters for `{command}`: {reason}")]
    Validation { command: String, reason: String },

    /// The transport could not complete the round-trip.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body did not have the expected structure.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True for transport failures and non-2xx responses.
    pub fn is_request_error(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::HttpStatus { .. })
    }

    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
