use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by wallet store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store root must already exist and does not.
    #[error("wallet directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// The payload carries an identity type this store cannot persist.
    #[error("unsupported identity type: {kind}")]
    UnsupportedIdentityType { kind: String },
    /// The payload has no private key but the store requires one.
    #[error("identity {label} has no private key")]
    MissingPrivateKey { label: String },
    /// The label cannot be used as a path segment.
    #[error("invalid label: {label:?}")]
    InvalidLabel { label: String },
    /// The payload is not a well-formed identity document.
    #[error("invalid identity data: {reason}")]
    InvalidData { reason: String },
    /// Underlying storage failure.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
}

/// Byte-level persistence of serialized identities, keyed by label.
///
/// Absence is not an error: `get` yields `None` for an unknown label and
/// `remove` of an unknown label succeeds.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Retrieve the serialized identity stored under a label.
    async fn get(&self, label: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Labels of all identities held by the store.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Persist a serialized identity under a label, overwriting any existing entry.
    async fn put(&self, label: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Remove a label and its data (idempotent).
    async fn remove(&self, label: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: WalletStore + ?Sized> WalletStore for Box<S> {
    async fn get(&self, label: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(label).await
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        (**self).list().await
    }

    async fn put(&self, label: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).put(label, data).await
    }

    async fn remove(&self, label: &str) -> Result<(), StoreError> {
        (**self).remove(label).await
    }
}

#[async_trait]
impl<S: WalletStore + ?Sized> WalletStore for Arc<S> {
    async fn get(&self, label: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(label).await
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        (**self).list().await
    }

    async fn put(&self, label: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).put(label, data).await
    }

    async fn remove(&self, label: &str) -> Result<(), StoreError> {
        (**self).remove(label).await
    }
}

/// Reject labels that cannot be used as a single path segment.
pub fn validate_label(label: &str) -> Result<(), StoreError> {
    let invalid = label.is_empty()
        || label == "."
        || label == ".."
        || label.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidLabel {
            label: label.to_string(),
        });
    }
    Ok(())
}

/// In-memory store for tests and ephemeral wallets.
/// `list` returns labels in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWalletStore {
    inner: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<(String, Vec<u8>)>>, StoreError> {
        self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn get(&self, label: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.lock()?;
        Ok(entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, data)| data.clone()))
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.lock()?;
        Ok(entries.iter().map(|(label, _)| label.clone()).collect())
    }

    async fn put(&self, label: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        match entries.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, existing)) => *existing = data.to_vec(),
            None => entries.push((label.to_string(), data.to_vec())),
        }
        Ok(())
    }

    async fn remove(&self, label: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.retain(|(existing, _)| existing != label);
        Ok(())
    }
}
