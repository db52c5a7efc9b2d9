mod cli;
mod config;
mod wallets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use fabric_wallet_core::{Migrator, Wallet, WalletStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Command, ConfigCommand};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Migrate {
            from,
            to,
            skip_unreadable,
        } => {
            let source = wallets::open(true, wallets::resolve_legacy_dir(from, &config)?).await?;
            let destination =
                wallets::open(false, wallets::resolve_wallet_dir(to, &config)?).await?;
            run_migrate(&source, &destination, skip_unreadable).await?
        }
        Command::List { legacy, dir } => {
            let dir = if legacy {
                wallets::resolve_legacy_dir(dir, &config)?
            } else {
                wallets::resolve_wallet_dir(dir, &config)?
            };
            let wallet = wallets::open(legacy, dir).await?;
            for label in wallet.list().await? {
                println!("{label}");
            }
        }
        Command::Remove { label, dir } => {
            let wallet = wallets::open(false, wallets::resolve_wallet_dir(dir, &config)?).await?;
            wallet.remove(&label).await?;
            println!("Removed {label}");
        }
        Command::Version => print_version(),
        Command::Config(ConfigCommand::Init) => init_config(cli.config, &config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("fabric-wallet {}", env!("CARGO_PKG_VERSION"));
}

async fn run_migrate<S: WalletStore, D: WalletStore>(
    source: &Wallet<S>,
    destination: &Wallet<D>,
    skip_unreadable: bool,
) -> Result<()> {
    let report = Migrator::new(source, destination)
        .skip_unreadable(skip_unreadable)
        .run()
        .await?;
    for label in &report.migrated {
        println!("migrated {label}");
    }
    for label in &report.skipped {
        println!("skipped {label}");
    }
    info!(
        migrated = report.migrated.len(),
        skipped = report.skipped.len(),
        "done"
    );
    Ok(())
}

fn init_config(path: Option<PathBuf>, config: &config::Config) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::default_path()?,
    };
    let path = config::write_if_missing(config, &path)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
