//! Protocol vocabulary shared across the harness.

/// Canonical media type for activity content.
pub const ACTIVITY_MEDIA_TYPE: &str = "application/activity+json";

/// ActivityStreams JSON-LD context URI.
pub const ACTIVITYSTREAMS_CONTEXT: &str = "https://www.w3.org/ns/activitystreams";

/// Security vocabulary context URI (public keys).
pub const SECURITY_CONTEXT: &str = "https://w3id.org/security/v1";

/// Baseline object kind assigned when a fixture omits `type`.
pub const DEFAULT_OBJECT_TYPE: &str = "Note";

/// Baseline activity kind assigned when a fixture omits `type`.
pub const DEFAULT_ACTIVITY_TYPE: &str = "Create";

/// Marker `type` for credential records held in the store.
///
/// Credential records exist only inside the store and are never serialized
/// over the wire, so the marker lives in a harness namespace rather than
/// the ActivityStreams vocabulary.
pub const CREDENTIALS_TYPE: &str = "https://fedsim.test/ns#Credentials";

/// Property carrying PEM-encoded private key text on a credential record.
pub const PRIVATE_KEY_PROPERTY: &str = "https://fedsim.test/ns#privateKey";
