use std::path::Path;

use crate::domain::config::ControllerConfig;
use crate::error::Result;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Reads the controller configuration, falling back to built-in defaults when no file is given.
pub fn load_config(file_path: Option<&Path>) -> Result<ControllerConfig> {
    match file_path {
        Some(path) => {
            let config = ControllerConfig::load(path)?;
            log::info!("Controller configuration loaded from '{}'.", path.display());
            Ok(config)
        }
        None => {
            log::info!("No controller configuration given, using built-in defaults.");
            Ok(ControllerConfig::default())
        }
    }
}
