use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "fabric-wallet",
    about = "Inspect Fabric identity wallets and migrate legacy wallets to the current layout",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Copy every identity from a legacy (V1) wallet into a V2 wallet.
    Migrate {
        /// Legacy wallet directory.
        #[arg(long)]
        from: Option<PathBuf>,
        /// Destination wallet directory (created if missing).
        #[arg(long)]
        to: Option<PathBuf>,
        /// Skip identities that cannot be decoded (e.g. HSM-backed) instead of aborting.
        #[arg(long)]
        skip_unreadable: bool,
    },
    /// List identity labels in a wallet.
    List {
        /// Read a legacy (V1) wallet.
        #[arg(long)]
        legacy: bool,
        /// Wallet directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Remove an identity from a V2 wallet.
    Remove {
        label: String,
        /// Wallet directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
