use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "fitdesk";

pub struct AppPaths;

impl AppPaths {
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Directory for exports when no explicit path is given; created on demand
    pub fn export_dir() -> Result<PathBuf> {
        let export_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join(APP_DIR)
            .join("exports");

        fs::create_dir_all(&export_dir)?;
        Ok(export_dir)
    }
}
