//! HTTP response surface handed back to test code.

use bytes::Bytes;
use serde_json::Value;

use crate::error::HarnessError;

/// Response to an actor `get`/`post`.
///
/// Non-success statuses are carried here rather than raised: callers decide
/// whether to inspect the status or escalate via [`Self::error_for_status`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    url: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl HttpResponse {
    /// Assemble a response from its parts. Header names are lowercased.
    pub fn new(
        status: u16,
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        let headers =
            headers.into_iter().map(|(name, value)| (name.to_lowercase(), value)).collect();

        Self { status, url: url.into(), headers, body }
    }

    /// Stub response for callers testing their own handling.
    pub fn stub(status: u16, body: &Value) -> Self {
        Self::new(status, "stub://", Vec::new(), Bytes::from(body.to_string()))
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is outside the 2xx range.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// First header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, HarnessError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HarnessError::InvalidResource { reason: e.to_string() })
    }

    /// Escalate a non-success status to an error, passing success through.
    pub fn error_for_status(self) -> Result<Self, HarnessError> {
        if self.is_error() {
            return Err(HarnessError::Status { status: self.status, url: self.url });
        }

        Ok(self)
    }
}
