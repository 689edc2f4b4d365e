//! Core data model and store contract for the fedsim test harness.
//!
//! Everything a federated server exchanges (actor profiles, activities,
//! objects, collections, credential records) is a JSON-object-shaped
//! [`Resource`] addressable by an `id`. The [`ResourceStore`] trait is the
//! persistence seam: the harness seeds fixtures through it and the server
//! under test reads them back, possibly from a different execution context.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod resource;
pub mod store;
pub mod vocab;

pub use resource::{Resource, ResourceError};
pub use store::{MemoryStore, ResourceStore, StoreError};
