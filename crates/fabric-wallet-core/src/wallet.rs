use thiserror::Error;
use tracing::instrument;

use crate::{
    identity::{self, Entry, IdentityError},
    store::{StoreError, WalletStore},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Identity wallet backed by a [`WalletStore`]. Every call goes to the store;
/// nothing is cached.
#[derive(Debug)]
pub struct Wallet<S: WalletStore> {
    store: S,
}

impl<S: WalletStore> Wallet<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store an entry under a label, replacing any existing entry.
    #[instrument(skip(self, entry))]
    pub async fn put(&self, label: &str, entry: &Entry) -> Result<(), WalletError> {
        let data = identity::encode(entry)?;
        self.store.put(label, &data).await?;
        Ok(())
    }

    /// Fetch and decode an entry. Missing labels yield `None`; stored data
    /// that fails to decode is an error.
    #[instrument(skip(self))]
    pub async fn get(&self, label: &str) -> Result<Option<Entry>, WalletError> {
        match self.store.get(label).await? {
            Some(data) => Ok(Some(identity::decode(&data)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<String>, WalletError> {
        Ok(self.store.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, label: &str) -> Result<(), WalletError> {
        Ok(self.store.remove(label).await?)
    }
}
