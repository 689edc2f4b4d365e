//! Per-test facade owning the store, HTTP client, and configuration.
//!
//! One `ServerHarness` is constructed per test and passed to every
//! collaborator; there is no process-wide singleton to reset between
//! tests. All actors created from the same harness share its store and
//! its private execution context.

use std::sync::Arc;

use fedsim_core::{Resource, ResourceStore, vocab};
use fedsim_crypto::{KeyProvider, RequestSigner, StaticKeyProvider};
use serde_json::json;

use crate::actor::{Actor, ActorRole};
use crate::bridge::{StoreBridge, SyncDriver};
use crate::communicator::RemoteCommunicator;
use crate::error::HarnessError;
use crate::http::SignedClient;

/// Base URLs for the two simulated authorities.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Authority of the server under test.
    pub local_base_url: String,
    /// Authority of the simulated remote side.
    pub remote_base_url: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            local_base_url: "https://server.test".to_string(),
            remote_base_url: "https://remote.test".to_string(),
        }
    }
}

/// Test-support facade: constructs actors and seeds their bootstrap data.
pub struct ServerHarness {
    config: HarnessConfig,
    driver: SyncDriver,
    bridge: StoreBridge,
    http: reqwest::Client,
    keys: Arc<dyn KeyProvider>,
    communicator: RemoteCommunicator,
}

impl std::fmt::Debug for ServerHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHarness").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ServerHarness {
    /// Harness over a store with default configuration and the fixture
    /// key provider.
    pub fn new(store: Arc<dyn ResourceStore>) -> Result<Self, HarnessError> {
        Self::with_config(store, HarnessConfig::default())
    }

    /// Harness with explicit base URLs.
    pub fn with_config(
        store: Arc<dyn ResourceStore>,
        config: HarnessConfig,
    ) -> Result<Self, HarnessError> {
        Self::with_key_provider(store, config, Arc::new(StaticKeyProvider::fixture()))
    }

    /// Harness with explicit base URLs and key material.
    pub fn with_key_provider(
        store: Arc<dyn ResourceStore>,
        config: HarnessConfig,
        keys: Arc<dyn KeyProvider>,
    ) -> Result<Self, HarnessError> {
        let driver = SyncDriver::new()?;
        let bridge = StoreBridge::new(store, driver.clone());
        let http = reqwest::Client::builder().build()?;

        Ok(Self { config, driver, bridge, http, keys, communicator: RemoteCommunicator::new() })
    }

    /// The harness configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Synchronous surface over the shared store, for test assertions.
    pub fn store(&self) -> &StoreBridge {
        &self.bridge
    }

    /// Create a local actor with seeded profile, credential record, and
    /// outbox/inbox/followers collections.
    ///
    /// The default name is `actor`. Actor ids are deterministic in
    /// (authority, name): repeating a call with the same name re-seeds the
    /// same identity.
    pub fn local_actor(&self, name: Option<&str>) -> Result<Actor, HarnessError> {
        let name = name.unwrap_or("actor");
        let base = self.config.local_base_url.trim_end_matches('/').to_string();
        let actor_id = format!("{base}/{name}");
        let key_id = format!("{actor_id}#main-key");
        let pair = self.keys.key_pair();

        let profile = Resource::from_value(json!({
            "@context": [vocab::ACTIVITYSTREAMS_CONTEXT, vocab::SECURITY_CONTEXT],
            "id": &actor_id,
            "type": "Person",
            "outbox": format!("{actor_id}/outbox"),
            "inbox": format!("{actor_id}/inbox"),
            "followers": format!("{actor_id}/followers"),
            "preferredUsername": name,
            "alsoKnownAs": format!("acct:{name}@{}", authority(&base)),
            "publicKey": {
                "id": &key_id,
                "owner": &actor_id,
                "publicKeyPem": &pair.public_key_pem,
            },
        }))?;

        self.bridge.put(profile.clone())?;
        self.bridge.put(Resource::collection(&format!("{actor_id}/outbox"), &actor_id, true))?;
        self.bridge.put(Resource::collection(&format!("{actor_id}/inbox"), &actor_id, true))?;
        self.bridge.put(Resource::collection(
            &format!("{actor_id}/followers"),
            &actor_id,
            false,
        ))?;
        self.bridge.put(Resource::credential(&actor_id, &pair.private_key_pem))?;

        let signer = RequestSigner::new(key_id, &pair.private_key_pem)?;
        tracing::info!(actor = %actor_id, role = %ActorRole::Local, "created actor");

        Ok(Actor::new(
            ActorRole::Local,
            actor_id,
            profile,
            base,
            SignedClient::new(self.http.clone(), self.driver.clone(), Some(signer)),
            self.bridge.clone(),
        ))
    }

    /// Create a remote actor with seeded profile and credential record.
    ///
    /// Remote actors get no seeded collections: the server under test
    /// fetches remote objects over the (simulated) wire, not from local
    /// collections. The default name is `remote`.
    pub fn remote_actor(&self, name: Option<&str>) -> Result<Actor, HarnessError> {
        self.remote_side_actor(name.unwrap_or("remote"), ActorRole::Remote)
    }

    /// Create a remote actor without signing capability.
    ///
    /// The default name is `unauthenticated`.
    pub fn unauthenticated_actor(&self, name: Option<&str>) -> Result<Actor, HarnessError> {
        self.remote_side_actor(name.unwrap_or("unauthenticated"), ActorRole::Unauthenticated)
    }

    /// Traffic inspection stub for the remote side.
    pub fn remote_communicator(&self) -> RemoteCommunicator {
        self.communicator.clone()
    }

    fn remote_side_actor(&self, name: &str, role: ActorRole) -> Result<Actor, HarnessError> {
        let base = self.config.remote_base_url.trim_end_matches('/').to_string();
        let actor_id = format!("{base}/{name}");
        let key_id = format!("{actor_id}#main-key");
        let pair = self.keys.key_pair();

        let profile = Resource::from_value(json!({
            "id": &actor_id,
            "type": "Person",
            "outbox": format!("{actor_id}/outbox"),
            "inbox": format!("{actor_id}/inbox"),
            "publicKey": {
                "id": &key_id,
                "owner": &actor_id,
                "publicKeyPem": &pair.public_key_pem,
            },
        }))?;

        self.bridge.put(profile.clone())?;
        self.bridge.put(Resource::credential(&actor_id, &pair.private_key_pem))?;

        let signer = match role {
            ActorRole::Remote => Some(RequestSigner::new(key_id, &pair.private_key_pem)?),
            _ => None,
        };
        tracing::info!(actor = %actor_id, role = %role, "created actor");

        Ok(Actor::new(
            role,
            actor_id,
            profile,
            base,
            SignedClient::new(self.http.clone(), self.driver.clone(), signer),
            self.bridge.clone(),
        ))
    }
}

/// Host part of a base URL, for `acct:` handles.
fn authority(base_url: &str) -> String {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| {
            base_url.trim_start_matches("https://").trim_start_matches("http://").to_string()
        })
}
