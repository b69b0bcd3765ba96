//! Shared plumbing for the `create_dw` and `etl_to_dw` binaries

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::warehouse::{WarehouseConfig, WarehouseError};

/// Install the log subscriber; `RUST_LOG` overrides the `info` default
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();
}

/// Resolve the job configuration
///
/// Without a file the reference layout under `data/` is used.
pub fn load_config(path: Option<&Path>) -> Result<WarehouseConfig, WarehouseError> {
    match path {
        Some(path) => WarehouseConfig::from_toml_file(path),
        None => Ok(WarehouseConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults() {
        assert_eq!(load_config(None).unwrap(), WarehouseConfig::default());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("no/such/dw.toml")));
        assert!(matches!(result, Err(WarehouseError::Io(_))));
    }
}
