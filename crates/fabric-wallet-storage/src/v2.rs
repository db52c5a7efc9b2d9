use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use fabric_wallet_core::store::{validate_label, StoreError, WalletStore};
use tracing::{debug, instrument};

use crate::fs_util::{read_optional, storage_err, write_atomic};

/// Suffix marking identity files; everything else in the directory is ignored.
pub const IDENTITY_FILE_SUFFIX: &str = ".id";

/// Flat wallet layout: one `<label>.id` JSON document per identity.
#[derive(Debug, Clone)]
pub struct FileSystemWalletStoreV2 {
    root: PathBuf,
}

impl FileSystemWalletStoreV2 {
    /// Open a store rooted at `directory`, creating it and any missing parents.
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = directory.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(storage_err)?;
        debug!(?root, "opened V2 wallet store");
        Ok(Self { root })
    }

    fn path_for(&self, label: &str) -> Result<PathBuf, StoreError> {
        validate_label(label)?;
        Ok(self.root.join(format!("{label}{IDENTITY_FILE_SUFFIX}")))
    }
}

#[async_trait]
impl WalletStore for FileSystemWalletStoreV2 {
    #[instrument(skip_all, fields(label = %label))]
    async fn get(&self, label: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(label)?;
        read_optional(&path).await
    }

    #[instrument(skip_all)]
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(storage_err)?;

        let mut labels = Vec::new();
        while let Some(dir_entry) = dir.next_entry().await.map_err(storage_err)? {
            if !dir_entry.file_type().await.map_err(storage_err)?.is_file() {
                continue;
            }
            let file_name = dir_entry.file_name();
            let Some(label) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(IDENTITY_FILE_SUFFIX))
                .filter(|label| validate_label(label).is_ok())
            else {
                debug!(?file_name, "ignoring non-identity file");
                continue;
            };
            labels.push(label.to_string());
        }

        labels.sort();
        Ok(labels)
    }

    #[instrument(skip_all, fields(label = %label))]
    async fn put(&self, label: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(label)?;
        write_atomic(path, data.to_vec()).await
    }

    #[instrument(skip_all, fields(label = %label))]
    async fn remove(&self, label: &str) -> Result<(), StoreError> {
        let path = self.path_for(label)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_err(err)),
        }
    }
}
