//! HTTP client wrapper attaching detached signatures to outgoing requests.

use bytes::Bytes;
use fedsim_crypto::{RequestSigner, body_digest, http_date};

use crate::bridge::SyncDriver;
use crate::error::HarnessError;
use crate::response::HttpResponse;

/// Wraps the shared HTTP client so requests carry a verifiable signature
/// tied to one actor's key identifier.
///
/// Clients without a signer still issue well-formed requests; they just
/// present no `Signature`, `Date`, or `Digest` headers.
#[derive(Debug, Clone)]
pub struct SignedClient {
    client: reqwest::Client,
    driver: SyncDriver,
    signer: Option<RequestSigner>,
}

impl SignedClient {
    /// Wrap a client, optionally signing with the given signer.
    pub fn new(client: reqwest::Client, driver: SyncDriver, signer: Option<RequestSigner>) -> Self {
        Self { client, driver, signer }
    }

    /// Whether outgoing requests are signed.
    pub fn is_signing(&self) -> bool {
        self.signer.is_some()
    }

    /// Issue a GET with the given `Accept` media type.
    pub fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, HarnessError> {
        let mut request = self.client.get(url).header("Accept", accept);

        if let Some(signer) = &self.signer {
            let date = http_date();
            let signature = signer.sign("GET", url, &date, None)?;
            request = request.header("Date", date).header("Signature", signature);
        }

        tracing::debug!(%url, signed = self.is_signing(), "GET");
        self.execute(url, request)
    }

    /// Issue a POST with the given body and `Content-Type` media type.
    pub fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<HttpResponse, HarnessError> {
        let mut request = self.client.post(url).header("Content-Type", content_type);

        if let Some(signer) = &self.signer {
            let date = http_date();
            let digest = body_digest(&body);
            let signature = signer.sign("POST", url, &date, Some(&digest))?;
            request = request
                .header("Date", date)
                .header("Digest", digest)
                .header("Signature", signature);
        }

        tracing::debug!(%url, bytes = body.len(), signed = self.is_signing(), "POST");
        self.execute(url, request.body(body))
    }

    /// Drive one request to completion on the private runtime.
    ///
    /// Transport failures become [`HarnessError::Transport`]; status codes
    /// are never interpreted here.
    fn execute(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, HarnessError> {
        self.driver.run(async move {
            let response = request.send().await?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (name.to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned())
                })
                .collect();
            let body: Bytes = response.bytes().await?;

            Ok(HttpResponse::new(status, url, headers, body))
        })
    }
}
