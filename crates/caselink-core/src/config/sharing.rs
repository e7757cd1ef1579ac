//! Inter-instance sharing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the inter-instance sharing protocol.
///
/// The `organizations` list is the local copy of the organization directory:
/// every counterpart instance this deployment may exchange data with, together
/// with the key material and credentials needed to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Identifier of the local organization, as known to counterpart instances.
    pub own_organization_id: String,
    /// Display name of the local organization.
    pub own_organization_name: String,
    /// Base64-encoded X25519 secret key of the local organization.
    pub own_secret_key: String,
    /// Fixed service-account user name used for HTTP Basic auth between instances.
    #[serde(default = "default_service_user")]
    pub service_user_name: String,
    /// Request timeout for outbound share calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Known counterpart organizations.
    #[serde(default)]
    pub organizations: Vec<OrganizationEntry>,
}

/// A single counterpart organization in the configured directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationEntry {
    /// Stable organization identifier.
    pub id: String,
    /// Display name shown when selecting a share target.
    pub name: String,
    /// Hostname (and optional port) of the counterpart instance.
    pub host_name: String,
    /// Password of the sharing service account on the counterpart instance.
    pub rest_user_password: String,
    /// Base64-encoded X25519 public key of the counterpart organization.
    pub public_key: String,
}

fn default_service_user() -> String {
    "s2s-service".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
