//! Storage key constants.

/// Keys of the persisted session state.
pub struct StorageKeys;

impl StorageKeys {
    /// Opaque bearer token issued by the Auth Endpoint.
    pub const SESSION_TOKEN: &'static str = "session_token";

    /// JSON-serialized user identity.
    pub const USER: &'static str = "user";
}
