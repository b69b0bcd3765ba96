//! Load the prepared inventory file into the data warehouse
//!
//! Exits non-zero on any failure. The table is cleared before the file is
//! read, so a failed run leaves it empty.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{error, info};

use histo_inventory_dw::cli::{init_logging, load_config};
use histo_inventory_dw::warehouse::WarehouseLoader;

/// Replace the inventory table with the prepared CSV snapshot
#[derive(Parser, Debug)]
#[command(name = "etl_to_dw", version, about)]
struct Cli {
    /// TOML file overriding warehouse_path, prepared_path or table_name
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).map_err(|e| anyhow!(e.user_message()))?;

    info!(
        warehouse = %config.warehouse_path.display(),
        prepared = %config.prepared_path.display(),
        table = %config.table_name,
        "Starting load"
    );

    let table = config.table_name.clone();
    let stats = WarehouseLoader::new(config)
        .load()
        .inspect_err(|e| error!("{}", e.user_message()))
        .with_context(|| format!("Loading {table} failed"))?;

    info!(
        rows_cleared = stats.rows_cleared,
        rows_inserted = stats.rows_inserted,
        "Load complete in {}",
        stats.duration_string()
    );
    Ok(())
}
