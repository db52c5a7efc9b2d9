use std::path::PathBuf;

use fabric_wallet_core::{migrate::Migrator, store::WalletStore, Wallet};
use fabric_wallet_storage::{open_legacy_wallet, open_wallet, FileSystemWalletStoreV1};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

async fn assert_readable<S: WalletStore>(wallet: &Wallet<S>) -> Vec<String> {
    let labels = wallet.list().await.expect("list");
    assert!(!labels.is_empty(), "wallet should not be empty");

    for label in &labels {
        let entry = wallet
            .get(label)
            .await
            .expect("get")
            .unwrap_or_else(|| panic!("{label} should be present"));
        assert!(!entry.credentials.is_empty());
        assert_eq!(entry.msp_id, "Org1MSP");
        assert!(!entry.private_key.as_pkcs8_der().is_empty());
    }
    labels
}

#[tokio::test]
async fn reads_v1_fixture_wallet() {
    let wallet = open_legacy_wallet(fixture("wallet-v1"))
        .await
        .expect("open v1");
    let labels = assert_readable(&wallet).await;
    assert_eq!(labels, vec!["user1", "user2"]);
}

#[tokio::test]
async fn reads_v2_fixture_wallet() {
    let wallet = open_wallet(fixture("wallet-v2")).await.expect("open v2");
    let labels = assert_readable(&wallet).await;
    assert_eq!(labels, vec!["user1", "user2"]);
}

#[tokio::test]
async fn v1_and_v2_fixtures_hold_the_same_identities() {
    let v1 = open_legacy_wallet(fixture("wallet-v1"))
        .await
        .expect("open v1");
    let v2 = open_wallet(fixture("wallet-v2")).await.expect("open v2");

    for label in ["user1", "user2"] {
        let legacy = v1.get(label).await.expect("v1 get");
        let flat = v2.get(label).await.expect("v2 get");
        assert!(legacy.is_some());
        assert_eq!(legacy, flat, "{label} differs between layouts");
    }
}

#[tokio::test]
async fn migrates_v1_fixture_into_empty_v2_wallet() {
    let source = open_legacy_wallet(fixture("wallet-v1"))
        .await
        .expect("open v1");
    let dir = tempfile::tempdir().expect("tempdir");
    let destination = open_wallet(dir.path().join("wallet"))
        .await
        .expect("open v2");

    let report = Migrator::new(&source, &destination)
        .run()
        .await
        .expect("migrate");

    assert_eq!(report.migrated, vec!["user1", "user2"]);
    assert!(report.skipped.is_empty());
    assert_eq!(destination.list().await.expect("list"), report.migrated);
    for label in &report.migrated {
        let migrated = destination.get(label).await.expect("dest get");
        let original = source.get(label).await.expect("source get");
        assert_eq!(migrated, original);
    }

    let rerun = Migrator::new(&source, &destination)
        .run()
        .await
        .expect("rerun");
    assert_eq!(rerun.migrated, report.migrated);
    assert_eq!(destination.list().await.expect("list"), report.migrated);
}

#[tokio::test]
async fn migrates_v2_wallet_back_into_legacy_layout() {
    let source = open_wallet(fixture("wallet-v2")).await.expect("open v2");
    let dir = tempfile::tempdir().expect("tempdir");
    let destination = Wallet::new(
        FileSystemWalletStoreV1::open(dir.path())
            .await
            .expect("open v1"),
    );

    let labels = fabric_wallet_core::migrate::migrate(&source, &destination)
        .await
        .expect("migrate");

    assert_eq!(labels, vec!["user1", "user2"]);
    for label in &labels {
        assert!(dir.path().join(label).join(label).is_file());
        assert_eq!(
            destination.get(label).await.expect("v1 get"),
            source.get(label).await.expect("v2 get")
        );
    }
}
