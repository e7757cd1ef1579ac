//! Per-counterparty payload encryption.
//!
//! Hybrid scheme: X25519 key agreement between the local secret key and the
//! counterpart organization's public key, payload sealed with
//! XChaCha20-Poly1305. The AEAD tag makes tampering detectable — a modified
//! ciphertext or a wrong claimed sender fails decryption instead of yielding
//! wrong bytes. The 24-byte nonce is appended to the ciphertext.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use crypto_box::aead::{AeadCore, AeadInPlace, OsRng};
use crypto_box::{ChaChaBox, PublicKey, SecretKey};
use std::sync::Arc;

use caselink_core::config::sharing::SharingConfig;
use caselink_core::{AppError, AppResult};
use caselink_directory::DirectoryService;

/// Nonce length for XChaCha20-Poly1305.
const NONCE_LEN: usize = 24;

/// Encrypts outbound share payloads and decrypts inbound ones.
pub struct EncryptionService {
    directory: Arc<DirectoryService>,
    own_secret: SecretKey,
}

impl EncryptionService {
    /// Build the service from the sharing configuration.
    ///
    /// Fails with a configuration error when the local secret key is missing
    /// or malformed.
    pub fn from_config(config: &SharingConfig, directory: Arc<DirectoryService>) -> AppResult<Self> {
        let key_bytes = BASE64
            .decode(&config.own_secret_key)
            .map_err(|e| AppError::configuration(format!("Invalid local secret key: {e}")))?;
        let key_bytes: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| AppError::configuration("Local secret key must be 32 bytes"))?;

        Ok(Self {
            directory,
            own_secret: SecretKey::from(key_bytes),
        })
    }

    /// Encrypt a payload for the given target organization.
    pub fn encrypt(&self, payload: &[u8], target_organization_id: &str) -> AppResult<Vec<u8>> {
        let shared = self.counterparty_box(target_organization_id)?;
        let nonce = ChaChaBox::generate_nonce(&mut OsRng);

        let mut buffer = payload.to_vec();
        shared
            .encrypt_in_place(&nonce, &[], &mut buffer)
            .map_err(|_| AppError::crypto("Encryption failed"))?;
        buffer.extend_from_slice(&nonce);

        Ok(buffer)
    }

    /// Decrypt a payload using the local secret key and the public key of the
    /// claimed sender organization.
    ///
    /// Any mismatch — tampered ciphertext, wrong claimed sender, truncated
    /// data — is a crypto error; the caller rejects the whole envelope.
    pub fn decrypt(&self, ciphertext: &[u8], claimed_sender_id: &str) -> AppResult<Vec<u8>> {
        let shared = self.counterparty_box(claimed_sender_id)?;

        if ciphertext.len() < NONCE_LEN {
            return Err(AppError::crypto("Ciphertext too short"));
        }
        let (body, nonce) = ciphertext.split_at(ciphertext.len() - NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| AppError::crypto("Malformed nonce"))?;

        let mut buffer = body.to_vec();
        shared
            .decrypt_in_place(&nonce.into(), &[], &mut buffer)
            .map_err(|_| AppError::crypto("Decryption failed"))?;

        Ok(buffer)
    }

    fn counterparty_box(&self, organization_id: &str) -> AppResult<ChaChaBox> {
        let org = self.directory.resolve(organization_id).ok_or_else(|| {
            AppError::configuration(format!(
                "No key material registered for organization {organization_id}"
            ))
        })?;

        Ok(ChaChaBox::new(
            &PublicKey::from(org.public_key),
            &self.own_secret,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caselink_core::config::sharing::OrganizationEntry;
    use caselink_core::error::ErrorKind;

    fn keypair() -> (SecretKey, PublicKey) {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        (secret, public)
    }

    fn service_for(
        own_id: &str,
        own_secret: &SecretKey,
        peers: Vec<(&str, &PublicKey)>,
    ) -> EncryptionService {
        let config = SharingConfig {
            own_organization_id: own_id.to_string(),
            own_organization_name: own_id.to_string(),
            own_secret_key: BASE64.encode(own_secret.to_bytes()),
            service_user_name: "s2s-service".to_string(),
            request_timeout_seconds: 30,
            organizations: peers
                .iter()
                .map(|(id, key)| OrganizationEntry {
                    id: id.to_string(),
                    name: id.to_string(),
                    host_name: format!("{id}.example.org"),
                    rest_user_password: "secret".to_string(),
                    public_key: BASE64.encode(key.as_bytes()),
                })
                .collect(),
        };
        let directory = Arc::new(DirectoryService::from_config(&config).unwrap());
        EncryptionService::from_config(&config, directory).unwrap()
    }

    #[test]
    fn test_roundtrip_between_two_instances() {
        let (secret_a, public_a) = keypair();
        let (secret_b, public_b) = keypair();

        let instance_a = service_for("org-a", &secret_a, vec![("org-b", &public_b)]);
        let instance_b = service_for("org-b", &secret_b, vec![("org-a", &public_a)]);

        let ciphertext = instance_a.encrypt(b"case payload", "org-b").unwrap();
        assert_ne!(&ciphertext[..ciphertext.len() - NONCE_LEN], b"case payload");

        let plaintext = instance_b.decrypt(&ciphertext, "org-a").unwrap();
        assert_eq!(plaintext, b"case payload");
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let (secret_a, public_a) = keypair();
        let (secret_b, public_b) = keypair();

        let instance_a = service_for("org-a", &secret_a, vec![("org-b", &public_b)]);
        let instance_b = service_for("org-b", &secret_b, vec![("org-a", &public_a)]);

        let mut ciphertext = instance_a.encrypt(b"case payload", "org-b").unwrap();
        ciphertext[0] ^= 0x01;

        let err = instance_b.decrypt(&ciphertext, "org-a").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Crypto);
    }

    #[test]
    fn test_wrong_claimed_sender_rejected() {
        let (secret_a, _) = keypair();
        let (secret_b, public_b) = keypair();
        let (_, public_c) = keypair();

        // The receiver knows org-a under a key that is not the sender's.
        let instance_a = service_for("org-a", &secret_a, vec![("org-b", &public_b)]);
        let instance_b = service_for("org-b", &secret_b, vec![("org-a", &public_c)]);

        let ciphertext = instance_a.encrypt(b"case payload", "org-b").unwrap();
        let err = instance_b.decrypt(&ciphertext, "org-a").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Crypto);
    }

    #[test]
    fn test_unknown_organization_is_configuration_error() {
        let (secret_a, _) = keypair();
        let instance_a = service_for("org-a", &secret_a, vec![]);

        let err = instance_a.encrypt(b"payload", "org-x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
