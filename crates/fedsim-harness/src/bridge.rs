//! Synchronous bridge over the asynchronous resource store.
//!
//! Test assertions are synchronous; the store is not. The bridge owns a
//! private current-thread runtime and drives exactly one store operation to
//! completion per call, blocking the calling thread until it resolves. The
//! harness sequences its calls single-threaded, so no two bridged
//! operations are ever in flight at once from the same test.

use std::future::Future;
use std::sync::Arc;

use fedsim_core::{Resource, ResourceStore, StoreError};

use crate::error::HarnessError;

/// Shared handle to the harness's private execution context.
///
/// Calling [`SyncDriver::run`] from inside an async context is a
/// programming error and will panic in the runtime; the bridge makes no
/// attempt to be reentrant.
#[derive(Debug, Clone)]
pub struct SyncDriver {
    runtime: Arc<tokio::runtime::Runtime>,
}

impl SyncDriver {
    /// Build a driver over a fresh current-thread runtime.
    pub fn new() -> Result<Self, HarnessError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HarnessError::Runtime { reason: e.to_string() })?;

        Ok(Self { runtime: Arc::new(runtime) })
    }

    /// Run one future to completion, blocking the calling thread.
    pub fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Synchronous `put`/`get` surface over a shared [`ResourceStore`].
#[derive(Clone)]
pub struct StoreBridge {
    store: Arc<dyn ResourceStore>,
    driver: SyncDriver,
}

impl std::fmt::Debug for StoreBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBridge").finish_non_exhaustive()
    }
}

impl StoreBridge {
    /// Bridge the given store through the given driver.
    pub fn new(store: Arc<dyn ResourceStore>, driver: SyncDriver) -> Self {
        Self { store, driver }
    }

    /// Store a resource, driving the async operation to completion.
    pub fn put(&self, resource: Resource) -> Result<(), StoreError> {
        self.driver.run(self.store.put(resource))
    }

    /// Retrieve a resource by id, driving the async operation to completion.
    pub fn get(&self, id: &str) -> Result<Resource, StoreError> {
        self.driver.run(self.store.get(id))
    }
}
