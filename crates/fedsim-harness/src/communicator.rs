//! Stub for inspecting traffic exchanged with the simulated remote side.

use bytes::Bytes;

use crate::error::HarnessError;

/// A request captured on its way to the remote side.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// HTTP method.
    pub method: String,
    /// Requested URL.
    pub url: String,
    /// Request headers as sent.
    pub headers: Vec<(String, String)>,
    /// Request body bytes.
    pub body: Bytes,
}

/// Inspection surface for remote-side traffic.
///
/// Capture is not wired yet: every accessor signals `NotSupported` rather
/// than pretending an empty capture is an answer.
#[derive(Debug, Clone, Default)]
pub struct RemoteCommunicator {
    _private: (),
}

impl RemoteCommunicator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The most recent POST exchanged with the remote side.
    pub fn most_recent_post(&self) -> Result<CapturedRequest, HarnessError> {
        Err(Self::not_wired("most_recent_post"))
    }

    /// The most recent captured request matching a predicate.
    pub fn request_matching(
        &self,
        _predicate: impl Fn(&CapturedRequest) -> bool,
    ) -> Result<CapturedRequest, HarnessError> {
        Err(Self::not_wired("request_matching"))
    }

    fn not_wired(operation: &'static str) -> HarnessError {
        HarnessError::NotSupported {
            operation,
            detail: "remote traffic capture is not wired".to_string(),
        }
    }
}
