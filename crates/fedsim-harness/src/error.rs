//! Harness error types.

use fedsim_core::{ResourceError, StoreError};
use fedsim_crypto::SignatureError;
use thiserror::Error;

/// Errors from harness operations.
///
/// Everything propagates to the immediate caller; the harness never retries
/// and never degrades a failure to a silent no-op.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The operation is not implemented for this role or capability.
    #[error("not supported: {operation} ({detail})")]
    NotSupported {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Why the operation is unavailable.
        detail: String,
    },

    /// Opt-in simulated failure, used to exercise caller error handling.
    #[error("injected fault for testing")]
    InjectedFault,

    /// Connection-level HTTP failure.
    #[error("transport error: {reason}")]
    Transport {
        /// Description of the transport failure.
        reason: String,
    },

    /// Non-success status escalated via [`crate::HttpResponse::error_for_status`].
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Store operation failed (including not-found lookups).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Signature construction failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// A body or resource was not JSON-object-shaped.
    #[error("invalid resource: {reason}")]
    InvalidResource {
        /// Parser diagnostic.
        reason: String,
    },

    /// The private runtime could not be constructed.
    #[error("runtime error: {reason}")]
    Runtime {
        /// Description of the runtime failure.
        reason: String,
    },
}

impl HarnessError {
    /// Whether this error is a store miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport { reason: err.to_string() }
    }
}

impl From<ResourceError> for HarnessError {
    fn from(err: ResourceError) -> Self {
        Self::InvalidResource { reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected() {
        let err = HarnessError::from(StoreError::NotFound { id: "urn:x".to_string() });
        assert!(err.is_not_found());

        let err = HarnessError::InjectedFault;
        assert!(!err.is_not_found());
    }

    #[test]
    fn status_display_names_url() {
        let err = HarnessError::Status { status: 502, url: "https://server.test/inbox".to_string() };
        assert_eq!(err.to_string(), "unexpected status 502 from https://server.test/inbox");
    }
}
