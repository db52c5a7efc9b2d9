//! Copying every entry of one wallet into another.

use tracing::{debug, info, instrument, warn};

use crate::{
    store::WalletStore,
    wallet::{Wallet, WalletError},
};

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Labels written to the destination, in source `list` order.
    pub migrated: Vec<String>,
    /// Labels listed by the source but not copied.
    pub skipped: Vec<String>,
}

/// Sequential, label-preserving copy from a source wallet to a destination.
///
/// Not transactional: a destination failure aborts the run and leaves whatever
/// was already written. Re-running is safe since `put` overwrites per label.
pub struct Migrator<'a, S: WalletStore, D: WalletStore> {
    source: &'a Wallet<S>,
    destination: &'a Wallet<D>,
    skip_unreadable: bool,
}

impl<'a, S: WalletStore, D: WalletStore> Migrator<'a, S, D> {
    pub fn new(source: &'a Wallet<S>, destination: &'a Wallet<D>) -> Self {
        Self {
            source,
            destination,
            skip_unreadable: false,
        }
    }

    /// Skip source entries that fail to decode (e.g. HSM identities) instead
    /// of aborting.
    pub fn skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    #[instrument(skip(self), fields(skip_unreadable = self.skip_unreadable))]
    pub async fn run(&self) -> Result<MigrationReport, WalletError> {
        let mut report = MigrationReport::default();

        for label in self.source.list().await? {
            let entry = match self.source.get(&label).await {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    debug!(%label, "entry vanished from source, skipping");
                    report.skipped.push(label);
                    continue;
                }
                Err(WalletError::Identity(err)) if self.skip_unreadable => {
                    warn!(%label, error = %err, "unreadable entry, skipping");
                    report.skipped.push(label);
                    continue;
                }
                Err(err) => return Err(err),
            };

            self.destination.put(&label, &entry).await?;
            debug!(%label, "migrated");
            report.migrated.push(label);
        }

        info!(
            migrated = report.migrated.len(),
            skipped = report.skipped.len(),
            "migration finished"
        );
        Ok(report)
    }
}

/// Copy every readable entry and return the migrated labels in source order.
pub async fn migrate<S: WalletStore, D: WalletStore>(
    source: &Wallet<S>,
    destination: &Wallet<D>,
) -> Result<Vec<String>, WalletError> {
    Ok(Migrator::new(source, destination).run().await?.migrated)
}
