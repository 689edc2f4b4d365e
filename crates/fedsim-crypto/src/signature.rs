//! Detached HTTP request signatures (cavage-style, RSA-SHA256).
//!
//! A signed request covers `(request-target)`, `host`, and `date`, plus
//! `digest` when the request carries a body. The `Signature` header is
//! keyed by the actor's public-key identifier URI so the receiving server
//! can resolve the verification key from the sender's profile.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

/// Errors from signature construction or verification.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Key material could not be parsed.
    #[error("invalid key material: {reason}")]
    InvalidKey {
        /// Parser diagnostic.
        reason: String,
    },

    /// The request URL could not be parsed or lacks a host.
    #[error("invalid request url: {reason}")]
    InvalidUrl {
        /// Parser diagnostic.
        reason: String,
    },

    /// The signature did not verify against the given key and message.
    #[error("signature verification failed")]
    Verification,
}

/// Signs outgoing requests on behalf of one actor.
///
/// Key material is parsed once at construction; signing itself cannot fail.
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").field("key_id", &self.key_id).finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Create a signer from a public-key identifier URI and a PEM-encoded
    /// RSA private key (PKCS#8 or PKCS#1).
    pub fn new(key_id: impl Into<String>, private_key_pem: &str) -> Result<Self, SignatureError> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(private_key_pem))
            .map_err(|e| SignatureError::InvalidKey { reason: e.to_string() })?;

        Ok(Self { key_id: key_id.into(), signing_key: SigningKey::<Sha256>::new(private_key) })
    }

    /// The public-key identifier URI carried in the `keyId` parameter.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Produce a `Signature` header value for the given request components.
    ///
    /// `date` must equal the request's `Date` header; `digest`, when
    /// present, must equal its `Digest` header.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        date: &str,
        digest: Option<&str>,
    ) -> Result<String, SignatureError> {
        let message = signing_string(method, url, date, digest)?;
        let signature = self.signing_key.sign(message.as_bytes());
        let encoded = BASE64.encode(signature.to_bytes());

        Ok(format!(
            "keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
            self.key_id,
            covered_headers(digest.is_some()),
            encoded,
        ))
    }
}

/// Canonical signing string over the covered request components.
pub fn signing_string(
    method: &str,
    url: &str,
    date: &str,
    digest: Option<&str>,
) -> Result<String, SignatureError> {
    let parsed =
        Url::parse(url).map_err(|e| SignatureError::InvalidUrl { reason: e.to_string() })?;

    let host = parsed
        .host_str()
        .ok_or_else(|| SignatureError::InvalidUrl { reason: format!("no host in {url}") })?;
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let mut target = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut lines = vec![
        format!("(request-target): {} {}", method.to_lowercase(), target),
        format!("host: {host}"),
        format!("date: {date}"),
    ];
    if let Some(digest) = digest {
        lines.push(format!("digest: {digest}"));
    }

    Ok(lines.join("\n"))
}

/// `Digest` header value for a request body.
pub fn body_digest(body: &[u8]) -> String {
    format!("SHA-256={}", BASE64.encode(Sha256::digest(body)))
}

/// Current time as an RFC 7231 `Date` header value.
pub fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Verify a base64 signature over a message with an SPKI public key PEM.
pub fn verify(
    public_key_pem: &str,
    message: &[u8],
    signature_b64: &str,
) -> Result<(), SignatureError> {
    let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
        .map_err(|e| SignatureError::InvalidKey { reason: e.to_string() })?;
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);

    let raw = BASE64.decode(signature_b64).map_err(|_| SignatureError::Verification)?;
    let signature = Signature::try_from(raw.as_slice()).map_err(|_| SignatureError::Verification)?;

    verifying_key.verify(message, &signature).map_err(|_| SignatureError::Verification)
}

/// Parse a `Signature` header value into its parameters.
///
/// Intended for test assertions against captured requests.
pub fn parse_signature_header(value: &str) -> BTreeMap<String, String> {
    value
        .split(',')
        .filter_map(|part| {
            let (name, raw) = part.split_once('=')?;
            Some((name.trim().to_string(), raw.trim().trim_matches('"').to_string()))
        })
        .collect()
}

fn covered_headers(with_digest: bool) -> &'static str {
    if with_digest { "(request-target) host date digest" } else { "(request-target) host date" }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::keys::{FIXTURE_PRIVATE_KEY_PEM, FIXTURE_PUBLIC_KEY_PEM};

    use super::*;

    const KEY_ID: &str = "https://server.test/actor#main-key";

    #[test]
    fn fixture_private_key_parses() {
        assert!(RequestSigner::new(KEY_ID, FIXTURE_PRIVATE_KEY_PEM).is_ok());
    }

    #[test]
    fn garbage_key_is_rejected() {
        let result = RequestSigner::new(KEY_ID, "not a pem");
        assert!(matches!(result, Err(SignatureError::InvalidKey { .. })));
    }

    #[test]
    fn signing_string_covers_target_host_and_date() {
        let message = signing_string(
            "GET",
            "https://server.test/actor/outbox?page=1",
            "Sat, 29 Aug 2026 12:00:00 GMT",
            None,
        )
        .unwrap();

        assert_eq!(
            message,
            "(request-target): get /actor/outbox?page=1\n\
             host: server.test\n\
             date: Sat, 29 Aug 2026 12:00:00 GMT"
        );
    }

    #[test]
    fn signing_string_keeps_explicit_port_and_digest() {
        let digest = body_digest(b"{}");
        let message = signing_string(
            "POST",
            "http://127.0.0.1:8080/inbox",
            "Sat, 29 Aug 2026 12:00:00 GMT",
            Some(&digest),
        )
        .unwrap();

        assert!(message.starts_with("(request-target): post /inbox\nhost: 127.0.0.1:8080\n"));
        assert!(message.ends_with(&format!("digest: {digest}")));
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let signer = RequestSigner::new(KEY_ID, FIXTURE_PRIVATE_KEY_PEM).unwrap();
        let date = http_date();

        let header = signer.sign("GET", "https://server.test/notes/1", &date, None).unwrap();
        let params = parse_signature_header(&header);

        assert_eq!(params.get("keyId").map(String::as_str), Some(KEY_ID));
        assert_eq!(params.get("algorithm").map(String::as_str), Some("rsa-sha256"));
        assert_eq!(
            params.get("headers").map(String::as_str),
            Some("(request-target) host date")
        );

        let message =
            signing_string("GET", "https://server.test/notes/1", &date, None).unwrap();
        verify(FIXTURE_PUBLIC_KEY_PEM, message.as_bytes(), &params["signature"]).unwrap();
    }

    #[test]
    fn tampered_message_fails_verification() {
        let signer = RequestSigner::new(KEY_ID, FIXTURE_PRIVATE_KEY_PEM).unwrap();
        let date = http_date();

        let header = signer.sign("GET", "https://server.test/notes/1", &date, None).unwrap();
        let params = parse_signature_header(&header);

        let tampered =
            signing_string("GET", "https://server.test/notes/2", &date, None).unwrap();
        let result = verify(FIXTURE_PUBLIC_KEY_PEM, tampered.as_bytes(), &params["signature"]);
        assert!(matches!(result, Err(SignatureError::Verification)));
    }

    #[test]
    fn body_digest_is_base64_sha256() {
        // SHA-256 of the empty string, a well-known vector.
        assert_eq!(body_digest(b""), "SHA-256=47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
    }

    #[test]
    fn post_signature_covers_digest() {
        let signer = RequestSigner::new(KEY_ID, FIXTURE_PRIVATE_KEY_PEM).unwrap();
        let date = http_date();
        let digest = body_digest(b"{\"type\":\"Create\"}");

        let header =
            signer.sign("POST", "https://server.test/inbox", &date, Some(&digest)).unwrap();
        let params = parse_signature_header(&header);

        assert_eq!(
            params.get("headers").map(String::as_str),
            Some("(request-target) host date digest")
        );

        let message =
            signing_string("POST", "https://server.test/inbox", &date, Some(&digest)).unwrap();
        verify(FIXTURE_PUBLIC_KEY_PEM, message.as_bytes(), &params["signature"]).unwrap();
    }
}
