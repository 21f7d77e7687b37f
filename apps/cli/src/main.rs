mod config;
#[cfg_attr(not(feature = "mysql"), allow(dead_code))]
mod runner;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use asset_sync_core::assets::{AssetRepositoryTrait, AssetStatus, AttachmentKind, AttachmentUpload, NewAsset};
use asset_sync_core::sync::SyncDirection;
use asset_sync_storage::assets::AssetRepository;
use asset_sync_storage::{create_pool, init};

use config::{Config, LogFormat};

#[derive(Parser)]
#[command(name = "asset-sync")]
#[command(about = "Track assets locally and sync them with the central server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the local database (overrides ASSET_SYNC_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local database and its tables
    Init,

    /// Save an asset locally, updating it if the serial number exists
    Add {
        #[arg(long)]
        model: String,
        #[arg(long)]
        serial: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: String,
        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        purchased: NaiveDate,
        /// Available, Deployed or Disposed/Sold
        #[arg(long, default_value = "Available")]
        status: AssetStatus,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
        /// Bill file to attach
        #[arg(long)]
        bill: Option<PathBuf>,
    },

    /// List local assets
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Change the location of a local asset
    Relocate { id: i32, location: String },

    /// Merge server data into the local database
    Pull,

    /// Merge local data into the server
    Push,

    /// Push, then pull
    Sync,
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

fn read_upload(path: &Path) -> Result<AttachmentUpload> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(AttachmentUpload::new(name, data))
}

fn repository(db_path: &str) -> Result<AssetRepository> {
    init(db_path)?;
    Ok(AssetRepository::new(create_pool(db_path)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = Config::from_env().with_db_override(cli.db);
    init_tracing(cli.verbose, config.log_format);

    match cli.command {
        Commands::Init => {
            let path = init(&config.db_path)?;
            println!("Local database ready at {}", path);
        }
        Commands::Add {
            model,
            serial,
            company,
            location,
            purchased,
            status,
            image,
            bill,
        } => {
            let new_asset = NewAsset {
                model,
                serial_number: serial,
                company,
                location,
                purchase_date: Some(purchased),
                status,
                image: image.as_deref().map(read_upload).transpose()?,
                bill: bill.as_deref().map(read_upload).transpose()?,
            };
            let repo = repository(&config.db_path)?;
            let asset = repo.save(new_asset)?;
            println!("Asset saved locally! ({} #{})", asset.serial_number, asset.id);
        }
        Commands::List { json } => {
            let repo = repository(&config.db_path)?;
            let assets = repo.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assets)?);
            } else {
                for asset in &assets {
                    let attachments: usize = AttachmentKind::ALL
                        .iter()
                        .map(|kind| repo.list_attachments(*kind, asset.id).map(|a| a.len()))
                        .sum::<asset_sync_core::Result<usize>>()?;
                    println!(
                        "{:>5}  {:<16} {:<20} {:<16} {:<14} {:<12} {} file(s)  last sync: {}",
                        asset.id,
                        asset.serial_number,
                        asset.model.as_deref().unwrap_or("-"),
                        asset.location.as_deref().unwrap_or("-"),
                        asset.status.as_deref().unwrap_or("-"),
                        asset.purchase_date.as_deref().unwrap_or("-"),
                        attachments,
                        asset.last_sync.as_deref().unwrap_or("never"),
                    );
                }
                if assets.is_empty() {
                    println!("No assets stored locally.");
                }
            }
        }
        Commands::Relocate { id, location } => {
            let repo = repository(&config.db_path)?;
            let asset = repo.update_location(id, &location)?;
            println!(
                "Asset {} moved to {}",
                asset.serial_number,
                asset.location.as_deref().unwrap_or("-")
            );
        }
        Commands::Pull => run_sync(&config, Some(SyncDirection::Pull)).await?,
        Commands::Push => run_sync(&config, Some(SyncDirection::Push)).await?,
        Commands::Sync => run_sync(&config, None).await?,
    }

    Ok(())
}

/// Runs one direction, or both when `direction` is `None`.
#[cfg(feature = "mysql")]
async fn run_sync(config: &Config, direction: Option<SyncDirection>) -> Result<()> {
    use asset_sync_core::config::RemoteConfig;
    use asset_sync_storage::MysqlConnector;

    let remote = RemoteConfig::from_env().context("Server settings are incomplete")?;
    tracing::debug!("Remote settings: {:?}", remote);
    init(&config.db_path)?;

    let runner = runner::SyncRunner::new(config.db_path.clone(), remote, MysqlConnector);
    let outcomes = match direction {
        Some(direction) => vec![runner.run(direction).await],
        None => runner.sync().await,
    };

    for outcome in &outcomes {
        println!("{}", outcome.message());
    }
    if outcomes.iter().any(|o| !o.is_success()) {
        bail!("Sync did not complete");
    }
    Ok(())
}

#[cfg(not(feature = "mysql"))]
async fn run_sync(_config: &Config, direction: Option<SyncDirection>) -> Result<()> {
    let what = direction.map_or_else(|| "sync".to_string(), |d| format!("sync {}", d));
    bail!(
        "Cannot {}: this binary was built without server support (enable the `mysql` feature)",
        what
    )
}
