//! Error types for the wheelhub-session crate.

use thiserror::Error;

/// The main error type for this crate.
///
/// Nothing in the session core is fatal: transport failures only ever
/// surface as `Disconnected` link events, and remote-service failures are
/// logged at the call boundary and dropped.
#[derive(Error, Debug)]
pub enum Error {
    /// The transport collaborator reported a failure.
    #[error("Transport error: {reason}")]
    Transport {
        /// Description of what went wrong in the transport layer.
        reason: String,
    },

    /// A remote service call (e.g. garage resolution) failed.
    #[error("Remote service error: {message}")]
    RemoteService {
        /// The error message from the remote service.
        message: String,
    },

    /// A dependent subsystem refused an operation.
    #[error("Subsystem error: {context}")]
    Subsystem {
        /// Description of the subsystem failure.
        context: String,
    },

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
