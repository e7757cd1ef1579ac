//! Directory lookup service.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use caselink_core::config::sharing::{OrganizationEntry, SharingConfig};
use caselink_core::{AppError, AppResult};

use crate::model::{OrganizationAccessData, OrganizationRef};

/// Resolves organization identifiers against the configured directory.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    own_id: String,
    own_name: String,
    organizations: Vec<OrganizationAccessData>,
}

impl DirectoryService {
    /// Build the directory from the sharing configuration.
    ///
    /// Fails with a configuration error if any configured public key is not
    /// valid base64 or has the wrong length.
    pub fn from_config(config: &SharingConfig) -> AppResult<Self> {
        let organizations = config
            .organizations
            .iter()
            .map(parse_entry)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            own_id: config.own_organization_id.clone(),
            own_name: config.own_organization_name.clone(),
            organizations,
        })
    }

    /// Identifier of the local organization.
    pub fn own_organization_id(&self) -> &str {
        &self.own_id
    }

    /// Reference to the local organization.
    pub fn own_organization_ref(&self) -> OrganizationRef {
        OrganizationRef {
            id: self.own_id.clone(),
            name: self.own_name.clone(),
        }
    }

    /// Resolve a counterpart organization by identifier.
    pub fn resolve(&self, id: &str) -> Option<&OrganizationAccessData> {
        self.organizations.iter().find(|org| org.id == id)
    }

    /// All known counterpart organizations.
    pub fn list_organizations(&self) -> Vec<OrganizationRef> {
        self.organizations
            .iter()
            .map(OrganizationAccessData::to_reference)
            .collect()
    }

    /// Whether no counterpart organizations are configured.
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}

fn parse_entry(entry: &OrganizationEntry) -> AppResult<OrganizationAccessData> {
    let key_bytes = BASE64.decode(&entry.public_key).map_err(|e| {
        AppError::configuration(format!("Invalid public key for organization {}: {e}", entry.id))
    })?;
    let public_key: [u8; 32] = key_bytes.try_into().map_err(|_| {
        AppError::configuration(format!(
            "Public key for organization {} must be 32 bytes",
            entry.id
        ))
    })?;

    Ok(OrganizationAccessData {
        id: entry.id.clone(),
        name: entry.name.clone(),
        host_name: entry.host_name.clone(),
        rest_user_password: entry.rest_user_password.clone(),
        public_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(orgs: Vec<OrganizationEntry>) -> SharingConfig {
        SharingConfig {
            own_organization_id: "org-a".to_string(),
            own_organization_name: "Instance A".to_string(),
            own_secret_key: BASE64.encode([7u8; 32]),
            service_user_name: "s2s-service".to_string(),
            request_timeout_seconds: 30,
            organizations: orgs,
        }
    }

    fn entry(id: &str) -> OrganizationEntry {
        OrganizationEntry {
            id: id.to_string(),
            name: format!("Instance {id}"),
            host_name: format!("{id}.example.org"),
            rest_user_password: "secret".to_string(),
            public_key: BASE64.encode([1u8; 32]),
        }
    }

    #[test]
    fn test_resolve_known_organization() {
        let dir = DirectoryService::from_config(&config_with(vec![entry("org-b")])).unwrap();
        assert!(dir.resolve("org-b").is_some());
        assert!(dir.resolve("org-c").is_none());
        assert!(!dir.is_empty());
    }

    #[test]
    fn test_rejects_short_public_key() {
        let mut bad = entry("org-b");
        bad.public_key = BASE64.encode([1u8; 16]);
        let result = DirectoryService::from_config(&config_with(vec![bad]));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_organizations() {
        let dir = DirectoryService::from_config(&config_with(vec![entry("org-b"), entry("org-c")]))
            .unwrap();
        let refs = dir.list_organizations();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].id, "org-b");
    }
}
