use std::path::PathBuf;

use color_eyre::{eyre::WrapErr, Result};
use dirs::data_dir;
use fabric_wallet_core::{Wallet, WalletStore};
use fabric_wallet_storage::{FileSystemWalletStoreV1, FileSystemWalletStoreV2};
use tracing::debug;

use crate::config::Config;

/// Resolve the default V2 wallet directory.
pub fn default_wallet_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("fabric-wallet").join("wallet"))
}

/// Flag, then config, then the platform default.
pub fn resolve_wallet_dir(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match flag.or_else(|| config.wallet_dir.clone()) {
        Some(dir) => Ok(dir),
        None => default_wallet_dir(),
    }
}

/// Flag, then config. There is no default legacy location.
pub fn resolve_legacy_dir(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    flag.or_else(|| config.legacy_dir.clone()).ok_or_else(|| {
        color_eyre::eyre::eyre!("no legacy wallet given; pass --from or set legacy_dir in config")
    })
}

/// Open either layout behind one store type.
pub async fn open(legacy: bool, dir: PathBuf) -> Result<Wallet<Box<dyn WalletStore>>> {
    debug!(?dir, legacy, "opening wallet");
    let store: Box<dyn WalletStore> = if legacy {
        Box::new(
            FileSystemWalletStoreV1::open(&dir)
                .await
                .wrap_err_with(|| format!("opening legacy wallet {}", dir.display()))?,
        )
    } else {
        Box::new(
            FileSystemWalletStoreV2::open(&dir)
                .await
                .wrap_err_with(|| format!("opening wallet {}", dir.display()))?,
        )
    };
    Ok(Wallet::new(store))
}
