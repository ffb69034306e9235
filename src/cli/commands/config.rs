//! Config Command
//!
//! Manage DocLearn configuration.
//!
//! Usage:
//!   doclearn config show [-g] [-f json|yaml]
//!   doclearn config path
//!   doclearn config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{DocError, Result};

/// Show configuration
pub fn show(global: bool, format: &str) -> Result<()> {
    if !matches!(format, "text" | "json" | "yaml") {
        return Err(DocError::InvalidInput(format!(
            "Invalid format '{}'. Valid values: text, json, yaml",
            format
        )));
    }

    if global {
        match ConfigLoader::global_config_path() {
            Some(global_path) if global_path.exists() => {
                let config = ConfigLoader::load_from_file(&global_path)?;
                if format == "text" {
                    println!("# Global Config: {}\n", global_path.display());
                }
                println!("{}", ConfigLoader::render(&config, format)?);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'doclearn config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }

    // Merged effective config
    let config = ConfigLoader::load()?;
    println!("{}", ConfigLoader::render(&config, format)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    let out = Output::new();
    out.success(&format!("Initialized {} configuration", scope));
    out.detail("Config", path.display());
    Ok(())
}
