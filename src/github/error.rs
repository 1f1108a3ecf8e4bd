//! Error types exposed by the credential broker.

use thiserror::Error;

/// Errors surfaced while validating input or communicating with GitHub.
///
/// Every message names the step that failed, for example
/// `list installations page 2 failed: ...`, so callers can tell which
/// upstream call broke without inspecting Octocrab internals.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// Caller input was malformed. No upstream call was made.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected input.
        message: String,
    },

    /// A transport failure, timeout, rate limit, or server error prevented
    /// the call from completing.
    #[error("GitHub unavailable: {message}")]
    UpstreamUnavailable {
        /// Transport-level or status detail.
        message: String,
    },

    /// GitHub explicitly denied access.
    #[error("GitHub denied access: {message}")]
    UpstreamAuthorization {
        /// GitHub error message returned with the denial.
        message: String,
    },

    /// GitHub answered, but the response lacked a field the broker needs.
    #[error("GitHub returned unusable data: {message}")]
    UpstreamData {
        /// Which field or record was missing or malformed.
        message: String,
    },

    /// The token-creation call completed but yielded no usable token.
    #[error("installation token could not be issued: {message}")]
    CredentialIssuance {
        /// Details about the issuance failure.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl BrokerError {
    /// Returns true when the error was raised before any upstream call.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
