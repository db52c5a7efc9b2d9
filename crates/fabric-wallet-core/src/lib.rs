//! Core abstractions for Fabric wallets: the byte-level store contract, the
//! identity codec, the wallet façade and migration between wallets.
//! Concrete file-system stores live in `fabric-wallet-storage`.

pub mod identity;
pub mod migrate;
pub mod private_key;
pub mod store;
pub mod wallet;

pub use identity::{Entry, IdentityData, IdentityError};
pub use migrate::{MigrationReport, Migrator};
pub use private_key::PrivateKey;
pub use store::{InMemoryWalletStore, StoreError, WalletStore};
pub use wallet::{Wallet, WalletError};
