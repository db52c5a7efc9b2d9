//! Legacy wallet layout: one directory per identity holding a JSON user record
//! named after the label, plus a detached `<signingIdentity>-priv` key file.
//!
//! The store speaks the V2 identity document at its boundary, converting on
//! every read and write.

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use fabric_wallet_core::{
    identity::{Credentials, IdentityData, HSM_X509_TYPE, SCHEMA_VERSION, X509_TYPE},
    store::{validate_label, StoreError, WalletStore},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::fs_util::{read_optional, storage_err, write_atomic};

const PRIVATE_KEY_SUFFIX: &str = "-priv";

/// User record written by the legacy tooling. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    name: String,
    mspid: String,
    enrollment: Enrollment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Enrollment {
    #[serde(rename = "signingIdentity")]
    signing_identity: String,
    identity: EnrollmentIdentity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnrollmentIdentity {
    certificate: String,
}

#[derive(Debug, Clone)]
pub struct FileSystemWalletStoreV1 {
    root: PathBuf,
}

impl FileSystemWalletStoreV1 {
    /// Open a store over an existing legacy wallet directory.
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = directory.into();
        match tokio::fs::metadata(&root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StoreError::DirectoryNotFound { path: root }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::DirectoryNotFound { path: root })
            }
            Err(err) => return Err(storage_err(err)),
        }
        debug!(?root, "opened V1 wallet store");
        Ok(Self { root })
    }

    fn identity_dir(&self, label: &str) -> PathBuf {
        self.root.join(label)
    }

    fn user_path(&self, label: &str) -> PathBuf {
        self.identity_dir(label).join(label)
    }

    fn private_key_path(&self, label: &str, user: &User) -> PathBuf {
        self.identity_dir(label)
            .join(format!("{}{PRIVATE_KEY_SUFFIX}", user.enrollment.signing_identity))
    }

    /// Load the user record for a label. Anything missing or malformed is
    /// treated as "no identity here".
    async fn read_user(&self, label: &str) -> Option<User> {
        let path = self.user_path(label);
        let data = match read_optional(&path).await {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(err) => {
                warn!(label, error = %err, "unreadable user record");
                return None;
            }
        };

        let user: User = match serde_json::from_slice(&data) {
            Ok(user) => user,
            Err(err) => {
                debug!(label, error = %err, "not a user record");
                return None;
            }
        };
        if validate_label(&user.enrollment.signing_identity).is_err() {
            warn!(label, "user record has an unusable signing identity");
            return None;
        }
        Some(user)
    }

    /// Load the detached key for a user; `None` means the key is held elsewhere.
    /// A key file that cannot be read is treated the same as a missing one.
    async fn read_private_key(&self, label: &str, user: &User) -> Option<String> {
        let path = self.private_key_path(label, user);
        let data = match read_optional(&path).await {
            Ok(data) => data?,
            Err(err) => {
                warn!(label, error = %err, "unreadable private key file");
                return None;
            }
        };
        match String::from_utf8(data) {
            Ok(pem) => Some(pem.trim().to_string()),
            Err(err) => {
                warn!(label, error = %err, "private key file is not UTF-8");
                None
            }
        }
    }
}

#[async_trait]
impl WalletStore for FileSystemWalletStoreV1 {
    #[instrument(skip_all, fields(label = %label))]
    async fn get(&self, label: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_label(label)?;
        let Some(user) = self.read_user(label).await else {
            return Ok(None);
        };
        let private_key = self.read_private_key(label, &user).await;
        if private_key.is_none() {
            debug!("no private key file, reading as HSM identity");
        }

        let data = user_to_identity_data(user, private_key);
        data.to_vec()
            .map(Some)
            .map_err(|e| StoreError::InvalidData {
                reason: e.to_string(),
            })
    }

    #[instrument(skip_all)]
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(storage_err)?;

        let mut labels = Vec::new();
        while let Some(dir_entry) = dir.next_entry().await.map_err(storage_err)? {
            if !dir_entry.file_type().await.map_err(storage_err)?.is_dir() {
                continue;
            }
            let Some(label) = dir_entry
                .file_name()
                .to_str()
                .filter(|name| validate_label(name).is_ok())
                .map(str::to_string)
            else {
                continue;
            };
            if self.read_user(&label).await.is_some() {
                labels.push(label);
            } else {
                debug!(%label, "ignoring directory without a user record");
            }
        }

        labels.sort();
        Ok(labels)
    }

    #[instrument(skip_all, fields(label = %label))]
    async fn put(&self, label: &str, data: &[u8]) -> Result<(), StoreError> {
        validate_label(label)?;
        let data = IdentityData::from_slice(data).map_err(|e| StoreError::InvalidData {
            reason: e.to_string(),
        })?;
        let (user, private_key) = identity_data_to_user(data, label)?;

        let previous = self.read_user(label).await;

        tokio::fs::create_dir_all(self.identity_dir(label))
            .await
            .map_err(storage_err)?;
        let user_json = serde_json::to_vec(&user).map_err(storage_err)?;
        write_atomic(self.user_path(label), user_json).await?;
        write_atomic(
            self.private_key_path(label, &user),
            private_key.into_bytes(),
        )
        .await?;

        if let Some(previous) = previous {
            let stale = self.private_key_path(label, &previous);
            match tokio::fs::remove_file(&stale).await {
                Ok(()) => debug!(?stale, "removed superseded private key"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(storage_err(err)),
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(label = %label))]
    async fn remove(&self, label: &str) -> Result<(), StoreError> {
        validate_label(label)?;
        match tokio::fs::remove_dir_all(self.identity_dir(label)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_err(err)),
        }
    }
}

fn user_to_identity_data(user: User, private_key: Option<String>) -> IdentityData {
    let kind = if private_key.is_some() {
        X509_TYPE
    } else {
        HSM_X509_TYPE
    };
    IdentityData {
        kind: kind.to_string(),
        version: SCHEMA_VERSION,
        msp_id: user.mspid,
        credentials: Credentials {
            certificate: user.enrollment.identity.certificate,
            private_key,
        },
    }
}

/// Only `X.509` identities with a key can be written; the legacy layout has no
/// keyless representation. A fresh signing identity token is minted each time.
fn identity_data_to_user(
    data: IdentityData,
    label: &str,
) -> Result<(User, String), StoreError> {
    if !data.is_x509() {
        return Err(StoreError::UnsupportedIdentityType { kind: data.kind });
    }
    let private_key = data
        .credentials
        .private_key
        .ok_or_else(|| StoreError::MissingPrivateKey {
            label: label.to_string(),
        })?;

    let user = User {
        name: label.to_string(),
        mspid: data.msp_id,
        enrollment: Enrollment {
            signing_identity: Uuid::new_v4().to_string(),
            identity: EnrollmentIdentity {
                certificate: data.credentials.certificate,
            },
        },
    };
    Ok((user, private_key))
}
