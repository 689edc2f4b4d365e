//! Simulated protocol participants.
//!
//! An [`Actor`] is a closed tagged variant over three roles with one shared
//! capability surface. Operations a role does not support fail with an
//! explicit [`HarnessError::NotSupported`] at call time, never a silent
//! no-op. Actors hold no state beyond identity and capabilities; their
//! lifetime is scoped to a single test.

use fedsim_core::{Resource, vocab};
use uuid::Uuid;

use crate::bridge::StoreBridge;
use crate::error::HarnessError;
use crate::http::SignedClient;
use crate::response::HttpResponse;

/// Participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// Hosted by the server under test.
    Local,
    /// Hosted on a foreign authority, with signing credentials.
    Remote,
    /// Hosted on a foreign authority, without signing credentials.
    Unauthenticated,
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(name)
    }
}

/// A simulated participant in the federation protocol.
///
/// `get`/`post` exercise the network path through the signing client;
/// `setup_object`/`setup_activity` write directly into the store,
/// bypassing the network.
#[derive(Debug, Clone)]
pub struct Actor {
    role: ActorRole,
    id: String,
    profile: Resource,
    base_url: String,
    client: SignedClient,
    bridge: StoreBridge,
    inject_fault: bool,
}

impl Actor {
    pub(crate) fn new(
        role: ActorRole,
        id: String,
        profile: Resource,
        base_url: String,
        client: SignedClient,
        bridge: StoreBridge,
    ) -> Self {
        Self { role, id, profile, base_url, client, bridge, inject_fault: false }
    }

    /// The actor's identity URI.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The actor's role.
    pub fn role(&self) -> ActorRole {
        self.role
    }

    /// The actor's identity document, immutable for the test.
    pub fn profile(&self) -> &Resource {
        &self.profile
    }

    /// Whether this actor signs its requests.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_signing()
    }

    /// Arm or disarm fault injection.
    ///
    /// While armed, `get` and `post` fail immediately with
    /// [`HarnessError::InjectedFault`] regardless of transport state. Used
    /// to validate the caller's own error-handling paths.
    pub fn inject_faults(&mut self, enabled: bool) {
        self.inject_fault = enabled;
    }

    /// Issue a (possibly signed) GET accepting the canonical activity
    /// media type.
    pub fn get(&self, url: &str) -> Result<HttpResponse, HarnessError> {
        self.get_as(url, vocab::ACTIVITY_MEDIA_TYPE)
    }

    /// Issue a (possibly signed) GET with an explicit `Accept` media type.
    pub fn get_as(&self, url: &str, media_type: &str) -> Result<HttpResponse, HarnessError> {
        if self.inject_fault {
            return Err(HarnessError::InjectedFault);
        }

        self.client.get(url, media_type)
    }

    /// Issue a (possibly signed) POST with the canonical activity media
    /// type.
    pub fn post(&self, url: &str, body: &Resource) -> Result<HttpResponse, HarnessError> {
        self.post_as(url, body, vocab::ACTIVITY_MEDIA_TYPE)
    }

    /// Issue a (possibly signed) POST with an explicit `Content-Type`.
    pub fn post_as(
        &self,
        url: &str,
        body: &Resource,
        media_type: &str,
    ) -> Result<HttpResponse, HarnessError> {
        if self.inject_fault {
            return Err(HarnessError::InjectedFault);
        }

        let bytes = serde_json::to_vec(body)
            .map_err(|e| HarnessError::InvalidResource { reason: e.to_string() })?;

        self.client.post(url, bytes, media_type)
    }

    /// Materialize an object directly in the store (no network hop).
    ///
    /// When `assign_id` is set and the properties carry no `id`, a fresh
    /// unique URI under the actor's namespace is assigned. A missing `type`
    /// defaults to the baseline object kind. The returned resource is
    /// retrievable via the store immediately after this call returns.
    pub fn setup_object(
        &self,
        properties: Resource,
        assign_id: bool,
    ) -> Result<Resource, HarnessError> {
        let mut object = properties;

        if assign_id {
            object.set_default("id", self.fresh_uri());
        }
        object.set_default("type", vocab::DEFAULT_OBJECT_TYPE);

        self.bridge.put(object.clone())?;
        tracing::debug!(actor = %self.id, id = ?object.id(), "seeded object");

        Ok(object)
    }

    /// Materialize an activity directly in the store.
    ///
    /// Local actors do not support this: local activities are expected to
    /// arise from protocol actions, not fixture injection. Remote-side
    /// actors default a missing `id` (fresh URI under the actor's
    /// namespace), `actor` (this actor's id), and `type` (the baseline
    /// activity kind).
    pub fn setup_activity(&self, properties: Resource) -> Result<Resource, HarnessError> {
        if self.role == ActorRole::Local {
            return Err(HarnessError::NotSupported {
                operation: "setup_activity",
                detail: format!(
                    "{} actors receive activities through protocol actions",
                    self.role
                ),
            });
        }

        let mut activity = properties;
        activity.set_default("id", self.fresh_uri());
        activity.set_default("actor", self.id.clone());
        activity.set_default("type", vocab::DEFAULT_ACTIVITY_TYPE);

        self.bridge.put(activity.clone())?;
        tracing::debug!(actor = %self.id, id = ?activity.id(), "seeded activity");

        Ok(activity)
    }

    /// Fresh unique URI under the actor's namespace.
    fn fresh_uri(&self) -> String {
        format!("{}/{}", self.base_url, Uuid::new_v4())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use fedsim_core::MemoryStore;
    use serde_json::json;

    use crate::bridge::SyncDriver;

    use super::*;

    fn test_actor(role: ActorRole) -> Actor {
        let driver = SyncDriver::new().unwrap();
        let bridge = StoreBridge::new(Arc::new(MemoryStore::new()), driver.clone());
        let client = SignedClient::new(reqwest::Client::new(), driver, None);

        Actor::new(
            role,
            "https://remote.test/alice".to_string(),
            Resource::from_value(json!({ "id": "https://remote.test/alice", "type": "Person" }))
                .unwrap(),
            "https://remote.test".to_string(),
            client,
            bridge,
        )
    }

    #[test]
    fn local_setup_activity_is_not_supported() {
        let actor = test_actor(ActorRole::Local);

        let result = actor.setup_activity(Resource::new());
        assert!(matches!(result, Err(HarnessError::NotSupported { .. })));
    }

    #[test]
    fn remote_setup_activity_defaults_actor_and_type() {
        let actor = test_actor(ActorRole::Remote);

        let activity = actor.setup_activity(Resource::new()).unwrap();
        assert_eq!(activity.get("actor").and_then(serde_json::Value::as_str), Some(actor.id()));
        assert_eq!(activity.kind(), Some("Create"));
        assert!(activity.id().unwrap().starts_with("https://remote.test/"));
    }

    #[test]
    fn setup_object_respects_supplied_id() {
        let actor = test_actor(ActorRole::Remote);
        let supplied =
            Resource::from_value(json!({ "id": "https://remote.test/fixed" })).unwrap();

        let object = actor.setup_object(supplied, true).unwrap();
        assert_eq!(object.id(), Some("https://remote.test/fixed"));
        assert_eq!(object.kind(), Some("Note"));
    }

    #[test]
    fn setup_object_without_assignment_requires_id() {
        let actor = test_actor(ActorRole::Remote);

        // No id supplied and none assigned: the store rejects the write.
        let result = actor.setup_object(Resource::new(), false);
        assert!(matches!(result, Err(HarnessError::Store(_))));
    }

    #[test]
    fn fault_injection_preempts_transport() {
        let mut actor = test_actor(ActorRole::Remote);
        actor.inject_faults(true);

        let result = actor.get("https://server.test/notes/1");
        assert!(matches!(result, Err(HarnessError::InjectedFault)));

        let result = actor.post("https://server.test/inbox", &Resource::new());
        assert!(matches!(result, Err(HarnessError::InjectedFault)));

        // Disarming restores the normal path (which will fail on transport
        // here since nothing is listening, not with an injected fault).
        actor.inject_faults(false);
        let result = actor.get("http://127.0.0.1:9/unreachable");
        assert!(matches!(result, Err(HarnessError::Transport { .. })));
    }

    #[test]
    fn role_display_is_lowercase() {
        assert_eq!(ActorRole::Local.to_string(), "local");
        assert_eq!(ActorRole::Unauthenticated.to_string(), "unauthenticated");
    }
}
