//! File-system wallet stores: the legacy directory-per-identity layout (V1)
//! and the flat one-file-per-identity layout (V2).

mod fs_util;
pub mod v1;
pub mod v2;

use std::path::PathBuf;

use fabric_wallet_core::{StoreError, Wallet};

pub use v1::FileSystemWalletStoreV1;
pub use v2::FileSystemWalletStoreV2;

/// Open a wallet over a V2 directory, creating it if needed.
pub async fn open_wallet(
    directory: impl Into<PathBuf>,
) -> Result<Wallet<FileSystemWalletStoreV2>, StoreError> {
    Ok(Wallet::new(FileSystemWalletStoreV2::open(directory).await?))
}

/// Open a wallet over an existing V1 directory.
pub async fn open_legacy_wallet(
    directory: impl Into<PathBuf>,
) -> Result<Wallet<FileSystemWalletStoreV1>, StoreError> {
    Ok(Wallet::new(FileSystemWalletStoreV1::open(directory).await?))
}
