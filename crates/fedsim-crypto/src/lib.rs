//! Credential material and HTTP signature construction for fedsim.
//!
//! All functions in this crate are pure: given the same key material,
//! request components, and date, they produce the same signature. The
//! harness composes them into outgoing requests; verifying inbound
//! signatures is the job of the server under test, but [`verify`] is
//! provided so harness tests can prove that constructed requests would be
//! accepted by a conformant verifier.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod keys;
pub mod signature;

pub use keys::{KeyPair, KeyProvider, StaticKeyProvider};
pub use signature::{
    RequestSigner, SignatureError, body_digest, http_date, signing_string, verify,
};
