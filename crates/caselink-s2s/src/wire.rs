//! Wire-level DTOs exchanged between instances.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use caselink_core::types::ValidationErrors;

/// The encrypted unit POSTed between instances.
///
/// The ciphertext decrypts only with the private key of the recipient in
/// combination with the public key of the *claimed* sender organization; a
/// wrong claim fails decryption instead of yielding wrong bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEnvelope {
    /// Identifier of the sending organization.
    pub sender_organization_id: String,
    /// Encrypted payload, base64-encoded on the wire.
    #[serde(
        serialize_with = "serialize_base64",
        deserialize_with = "deserialize_base64"
    )]
    pub data: Vec<u8>,
}

impl ShareEnvelope {
    /// Create a new envelope.
    pub fn new(sender_organization_id: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            sender_organization_id: sender_organization_id.into(),
            data,
        }
    }
}

/// Error body returned by a receiving instance that rejected a share.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Summary message.
    pub message: String,
    /// Per-entity validation errors, when the rejection was a validation
    /// failure.
    #[serde(default)]
    pub errors: ValidationErrors,
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(data))
}

fn deserialize_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    BASE64.decode(encoded).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_base64_on_wire() {
        let envelope = ShareEnvelope::new("org-a", vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["senderOrganizationId"], "org-a");
        assert_eq!(json["data"], BASE64.encode([0xde, 0xad, 0xbe, 0xef]));

        let parsed: ShareEnvelope = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_envelope_rejects_bad_base64() {
        let json = r#"{"senderOrganizationId":"org-a","data":"not base64!!"}"#;
        assert!(serde_json::from_str::<ShareEnvelope>(json).is_err());
    }

    #[test]
    fn test_error_response_errors_optional() {
        let json = r#"{"message":"rejected"}"#;
        let parsed: ErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.message, "rejected");
        assert!(parsed.errors.is_empty());
    }
}
