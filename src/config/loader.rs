//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/doclearn/config.toml)
//! 3. Project config (.doclearn/config.toml)
//! 4. Environment variables (DOCLEARN_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // DOCLEARN_LLM__MODEL -> llm.model
        figment = figment.merge(Self::env_provider());

        let config: Config = figment
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn env_provider() -> Env {
        Env::prefixed("DOCLEARN_").split("__").lowercase(true)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/doclearn/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("doclearn"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".doclearn/config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration as text (TOML), JSON or YAML
    pub fn render(config: &Config, format: &str) -> Result<String> {
        match format {
            "json" => Ok(serde_json::to_string_pretty(config)?),
            "yaml" => Ok(serde_yaml::to_string(config)?),
            _ => toml::to_string_pretty(config).map_err(|e| DocError::Config(e.to_string())),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the default global configuration file.
    /// Returns the path written, or the existing path when not forced.
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            DocError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    /// Write the default project configuration file (.doclearn/config.toml)
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let config_path = Self::project_config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(());
        }
        fs::write(path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(())
    }

    /// Default config file content (TOML)
    fn default_config() -> String {
        r#"# DocLearn Configuration
# Project settings in .doclearn/config.toml override the global file.
# Environment overrides use DOCLEARN_<SECTION>__<KEY>, e.g. DOCLEARN_LLM__MODEL.

version = "1.0"

# Text-completion backend: gemini (GEMINI_API_KEY), openai (OPENAI_API_KEY), ollama
[llm]
provider = "gemini"
# model = "gemini-2.0-flash"   # unset: each provider picks its default
timeout_secs = 300
temperature = 0.7

# Encyclopedia summary lookup
[lookup]
api_base = "https://en.wikipedia.org/api/rest_v1"
timeout_secs = 10

[pipeline]
question_count = 10
strict_question_count = false
default_level = "basic"

[output]
format = "markdown"
dir = "."
"#
        .to_string()
    }
}
