//! kipipe - component catalog loader
//!
//! Fetches parts from Digi-Key and Mouser, normalizes them into catalog
//! records and stores them in the SQLite catalog in the root folder.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use kipipe_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use kipipe_fetch::batch::{run_batch, PartNumberSource, DEFAULT_CSV_COLUMN};
use kipipe_fetch::config::SupplierCredentials;
use kipipe_fetch::db::categories;
use kipipe_fetch::mapping::SupplierProfile;
use kipipe_fetch::suppliers::{DigiKeyClient, MouserClient};
use kipipe_fetch::{ComponentProcessor, RecipeBook, SqliteCatalogStore, SupplierSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Config file module name (`~/.config/kipipe/fetch.toml`)
const MODULE_NAME: &str = "fetch";

#[derive(Parser, Debug)]
#[command(name = "kipipe")]
#[command(about = "Fetch, normalize and catalog electronic components")]
#[command(version)]
struct Cli {
    /// Root folder holding the catalog database
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch parts from suppliers and store them
    Fetch(FetchArgs),

    /// List supplier categories waiting for a mapping
    Unmapped,

    /// Map a supplier category string to an internal category
    MapCategory {
        /// Supplier that reported the string
        #[arg(long)]
        supplier: String,

        /// Exact supplier category string
        #[arg(long)]
        supplier_category: String,

        /// Internal category id
        #[arg(long)]
        category_id: i64,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["part_number", "txt", "csv"])))]
struct FetchArgs {
    /// Manufacturer part number to fetch
    #[arg(short, long)]
    part_number: Option<String>,

    /// Text file with one part number per line
    #[arg(long)]
    txt: Option<PathBuf>,

    /// CSV file with a part number column
    #[arg(long)]
    csv: Option<PathBuf>,

    /// CSV column holding part numbers
    #[arg(long, default_value = DEFAULT_CSV_COLUMN)]
    column: String,
}

impl FetchArgs {
    fn source(&self) -> PartNumberSource {
        if let Some(path) = &self.csv {
            PartNumberSource::Csv {
                path: path.clone(),
                column: self.column.clone(),
            }
        } else if let Some(path) = &self.txt {
            PartNumberSource::Txt(path.clone())
        } else {
            PartNumberSource::Single(self.part_number.clone().unwrap_or_default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TomlConfig::load_or_default(MODULE_NAME);

    init_tracing(&config)?;

    info!(
        "Starting kipipe v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new(MODULE_NAME).resolve_with(cli.root_folder.as_deref());
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = kipipe_common::db::init_database(&db_path)
        .await
        .context("Failed to open catalog database")?;

    match cli.command {
        Command::Fetch(args) => {
            let suppliers = build_suppliers(&SupplierCredentials::resolve(&config.suppliers));
            if suppliers.is_empty() {
                bail!("No supplier credentials configured (set DIGIKEY_CLIENT_ID/DIGIKEY_CLIENT_SECRET or MOUSER_API_KEY)");
            }

            let part_numbers = args
                .source()
                .load()
                .context("Failed to load part numbers")?;

            let processor = ComponentProcessor::new(
                Arc::new(SqliteCatalogStore::new(pool)),
                suppliers,
                RecipeBook::standard(),
                config.base_selection,
            );

            let summary = run_batch(&processor, &part_numbers).await;
            println!(
                "{} stored, {} not stored, {} failed (run {})",
                summary.stored, summary.not_stored, summary.failed, summary.run_id
            );
        }
        Command::Unmapped => {
            let queue = categories::list_unmapped(&pool).await?;
            if queue.is_empty() {
                println!("No unmapped categories");
            }
            for entry in queue {
                println!("{}\t{}\t{}", entry.id, entry.supplier_name, entry.supplier_category);
            }
        }
        Command::MapCategory {
            supplier,
            supplier_category,
            category_id,
        } => {
            categories::assign_mapping(&pool, &supplier, &supplier_category, category_id).await?;
            println!("Mapped '{}' to category {}", supplier_category, category_id);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// Configured suppliers in priority order (Digi-Key first)
fn build_suppliers(credentials: &SupplierCredentials) -> Vec<SupplierSource> {
    let mut suppliers = Vec::new();

    match &credentials.digikey {
        Some(creds) => {
            match DigiKeyClient::new(creds.client_id.clone(), creds.client_secret.clone()) {
                Ok(client) => suppliers.push(SupplierSource::new(
                    Arc::new(client),
                    SupplierProfile::digikey(),
                )),
                Err(e) => warn!("Digi-Key client unavailable: {}", e),
            }
        }
        None => warn!("Digi-Key credentials not set, skipping Digi-Key"),
    }

    match &credentials.mouser_api_key {
        Some(key) => match MouserClient::new(key.clone()) {
            Ok(client) => suppliers.push(SupplierSource::new(
                Arc::new(client),
                SupplierProfile::mouser(),
            )),
            Err(e) => warn!("Mouser client unavailable: {}", e),
        },
        None => warn!("Mouser API key not set, skipping Mouser"),
    }

    suppliers
}
