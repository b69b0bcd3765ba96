//! Delete and recreate the inventory data warehouse
//!
//! Always exits successfully; failures only show up in the log.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use histo_inventory_dw::cli::{init_logging, load_config};
use histo_inventory_dw::warehouse::{SchemaStatus, WarehouseInitializer};

/// Delete and recreate the inventory data warehouse
#[derive(Parser, Debug)]
#[command(name = "create_dw", version, about)]
struct Cli {
    /// TOML file overriding warehouse_path, prepared_path or table_name
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e.user_message());
            return;
        }
    };

    info!("Starting data warehouse creation...");
    match WarehouseInitializer::new(config).reset() {
        SchemaStatus::Ensured => {}
        SchemaStatus::Failed(e) => warn!("Warehouse schema was not created: {e}"),
    }
    info!("Data warehouse creation complete.");
}
