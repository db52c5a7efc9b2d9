//! Versioned JSON representation of wallet identities and the codec between
//! that representation and in-memory [`Entry`] values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::private_key::PrivateKey;

/// Type tag of an identity whose private key is stored with the certificate.
pub const X509_TYPE: &str = "X.509";
/// Type tag of an identity whose private key is held by an HSM.
pub const HSM_X509_TYPE: &str = "HSM-X.509";
/// The only schema version this codec reads or writes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("unsupported identity type: {kind}")]
    UnsupportedIdentityType { kind: String },
    #[error("unsupported identity data version: {version}")]
    UnsupportedVersion { version: u32 },
    #[error("malformed identity data: {reason}")]
    Malformed { reason: String },
    #[error("invalid private key: {reason}")]
    InvalidPrivateKey { reason: String },
    #[error("identity has no credentials")]
    EmptyCredentials,
}

/// A decoded credential: PEM certificate bytes, signing key and owning MSP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub credentials: Vec<u8>,
    pub private_key: PrivateKey,
    pub msp_id: String,
}

impl Entry {
    pub fn new(
        credentials: impl Into<Vec<u8>>,
        private_key: PrivateKey,
        msp_id: impl Into<String>,
    ) -> Self {
        Self {
            credentials: credentials.into(),
            private_key,
            msp_id: msp_id.into(),
        }
    }
}

/// Stored identity document. `private_key` is absent for HSM identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityData {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    #[serde(rename = "mspId")]
    pub msp_id: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub certificate: String,
    #[serde(
        rename = "privateKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_key: Option<String>,
}

impl IdentityData {
    pub fn from_slice(data: &[u8]) -> Result<Self, IdentityError> {
        serde_json::from_slice(data).map_err(|e| IdentityError::Malformed {
            reason: e.to_string(),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, IdentityError> {
        serde_json::to_vec(self).map_err(|e| IdentityError::Malformed {
            reason: e.to_string(),
        })
    }

    pub fn is_x509(&self) -> bool {
        self.kind == X509_TYPE
    }
}

/// Serialize an entry as an `X.509` version 1 document.
pub fn encode(entry: &Entry) -> Result<Vec<u8>, IdentityError> {
    if entry.credentials.is_empty() {
        return Err(IdentityError::EmptyCredentials);
    }
    let certificate =
        String::from_utf8(entry.credentials.clone()).map_err(|e| IdentityError::Malformed {
            reason: format!("certificate is not UTF-8: {e}"),
        })?;

    IdentityData {
        kind: X509_TYPE.to_string(),
        version: SCHEMA_VERSION,
        msp_id: entry.msp_id.clone(),
        credentials: Credentials {
            certificate,
            private_key: Some(entry.private_key.to_pkcs8_pem()),
        },
    }
    .to_vec()
}

/// Parse a stored document into an entry. Only `X.509` version 1 documents
/// that carry a private key can be decoded; HSM identities cannot sign here.
pub fn decode(data: &[u8]) -> Result<Entry, IdentityError> {
    let data = IdentityData::from_slice(data)?;
    if !data.is_x509() {
        return Err(IdentityError::UnsupportedIdentityType { kind: data.kind });
    }
    if data.version != SCHEMA_VERSION {
        return Err(IdentityError::UnsupportedVersion {
            version: data.version,
        });
    }
    if data.credentials.certificate.is_empty() {
        return Err(IdentityError::EmptyCredentials);
    }

    let pem = data
        .credentials
        .private_key
        .as_deref()
        .ok_or_else(|| IdentityError::Malformed {
            reason: "X.509 identity has no private key".to_string(),
        })?;
    let private_key = PrivateKey::from_pkcs8_pem(pem)?;

    Ok(Entry {
        credentials: data.credentials.certificate.into_bytes(),
        private_key,
        msp_id: data.msp_id,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CERT_PEM: &str = include_str!("../../../fixtures/certificate.pem");
    const KEY_PEM: &str = include_str!("../../../fixtures/private_key.pem");

    fn entry() -> Entry {
        let key = PrivateKey::from_pkcs8_pem(KEY_PEM).expect("fixture key");
        Entry::new(CERT_PEM, key, "Org1MSP")
    }

    #[test]
    fn decode_inverts_encode() {
        let original = entry();
        let bytes = encode(&original).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn encode_emits_versioned_x509_document() {
        let bytes = encode(&entry()).expect("encode");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

        assert_eq!(value["type"], "X.509");
        assert_eq!(value["version"], 1);
        assert_eq!(value["mspId"], "Org1MSP");
        assert_eq!(value["credentials"]["certificate"], CERT_PEM);
        assert_eq!(value["credentials"]["privateKey"], KEY_PEM);
    }

    #[test]
    fn decode_normalizes_key_line_endings() {
        let doc = json!({
            "type": "X.509",
            "version": 1,
            "mspId": "Org1MSP",
            "credentials": {
                "certificate": CERT_PEM,
                "privateKey": KEY_PEM.replace('\n', "\r\n"),
            },
        });
        let decoded = decode(doc.to_string().as_bytes()).expect("decode");
        assert_eq!(decoded, entry());
    }

    #[test]
    fn decode_rejects_hsm_identity() {
        let doc = json!({
            "type": "HSM-X.509",
            "version": 1,
            "mspId": "Org1MSP",
            "credentials": { "certificate": CERT_PEM },
        });
        let err = decode(doc.to_string().as_bytes()).expect_err("hsm is not decodable");
        assert_eq!(
            err,
            IdentityError::UnsupportedIdentityType {
                kind: HSM_X509_TYPE.to_string()
            }
        );
    }

    #[test]
    fn decode_rejects_other_versions() {
        let mut data = IdentityData::from_slice(&encode(&entry()).expect("encode")).expect("parse");
        data.version = 2;
        let err = decode(&data.to_vec().expect("serialize")).expect_err("version 2");
        assert_eq!(err, IdentityError::UnsupportedVersion { version: 2 });
    }

    #[test]
    fn decode_rejects_empty_certificate_and_garbage() {
        let doc = json!({
            "type": "X.509",
            "version": 1,
            "mspId": "Org1MSP",
            "credentials": { "certificate": "", "privateKey": KEY_PEM },
        });
        let err = decode(doc.to_string().as_bytes()).expect_err("empty certificate");
        assert_eq!(err, IdentityError::EmptyCredentials);

        let err = decode(b"not json").expect_err("garbage");
        assert!(matches!(err, IdentityError::Malformed { .. }));
    }

    #[test]
    fn decode_rejects_certificate_posing_as_private_key() {
        let doc = json!({
            "type": "X.509",
            "version": 1,
            "mspId": "Org1MSP",
            "credentials": {
                "certificate": CERT_PEM,
                "privateKey": CERT_PEM.replace("CERTIFICATE", "PRIVATE KEY"),
            },
        });
        let err = decode(doc.to_string().as_bytes()).expect_err("certificate is not a key");
        assert!(matches!(err, IdentityError::InvalidPrivateKey { .. }));
    }

    #[test]
    fn hsm_document_omits_private_key_field() {
        let data = IdentityData {
            kind: HSM_X509_TYPE.to_string(),
            version: SCHEMA_VERSION,
            msp_id: "Org1MSP".to_string(),
            credentials: Credentials {
                certificate: CERT_PEM.to_string(),
                private_key: None,
            },
        };
        let value: serde_json::Value =
            serde_json::from_slice(&data.to_vec().expect("serialize")).expect("json");
        assert!(value["credentials"].get("privateKey").is_none());
    }
}
