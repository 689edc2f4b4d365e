//! Federated-actor simulation and signed-request test harness.
//!
//! The harness impersonates participants in a federated object-exchange
//! protocol against one process under test. It simulates exactly two roles:
//! a local actor hosted by the server under test, and a remote actor on a
//! foreign authority (optionally unauthenticated).
//!
//! ## Architecture
//!
//! ```text
//! fedsim-harness
//!   ├─ ServerHarness      (per-test facade: store, client, config, keys)
//!   ├─ Actor              (Local/Remote/Unauthenticated capability surface)
//!   ├─ SignedClient       (reqwest wrapper attaching HTTP signatures)
//!   ├─ StoreBridge        (sync surface over the async resource store)
//!   └─ RemoteCommunicator (traffic inspection stub)
//! ```
//!
//! Test code is synchronous: every bridged call drives exactly one
//! asynchronous operation to completion on a private runtime. The harness
//! performs no retries and no silent recovery: masking a failure would
//! invalidate the tests it supports.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actor;
mod bridge;
mod communicator;
mod error;
mod harness;
mod http;
mod response;

pub use actor::{Actor, ActorRole};
pub use bridge::{StoreBridge, SyncDriver};
pub use communicator::{CapturedRequest, RemoteCommunicator};
pub use error::HarnessError;
pub use harness::{HarnessConfig, ServerHarness};
pub use http::SignedClient;
pub use response::HttpResponse;
