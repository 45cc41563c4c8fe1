//! Application configuration for the catalog tooling.
//!
//! An optional `automl-catalog.toml` in the working directory can move the
//! data and output directories. CLI flags override config file values, which
//! override defaults. With no file and no flags the tool reads
//! `data/systems` and writes `docs`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "automl-catalog.toml";

// ---------------------------------------------------------------------------
// Config structs (matching automl-catalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where records are read from and documents written to.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory searched recursively for record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory generated documents are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the authoring template, never loaded as a record.
    #[serde(default = "default_template_file")]
    pub template_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            template_file: default_template_file(),
        }
    }
}

impl PathsConfig {
    /// Reject values no run could work with.
    pub fn check(&self) -> Result<()> {
        if self.template_file.is_empty() || self.template_file.contains(['/', '\\']) {
            return Err(CatalogError::validation(format!(
                "paths.template_file must be a bare file name, got {:?}",
                self.template_file
            )));
        }
        if self.data_dir == self.output_dir {
            return Err(CatalogError::validation(
                "paths.data_dir and paths.output_dir must differ",
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data").join("systems")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_template_file() -> String {
    "_template.yml".into()
}

// ---------------------------------------------------------------------------
// Catalog config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for one run, merged from config file + CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub template_file: String,
}

impl From<&AppConfig> for CatalogConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            data_dir: config.paths.data_dir.clone(),
            output_dir: config.paths.output_dir.clone(),
            template_file: config.paths.template_file.clone(),
        }
    }
}

impl CatalogConfig {
    /// Apply CLI overrides on top of file/default values.
    ///
    /// The merged paths are checked again, since a flag can point the output
    /// at the record directory.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if self.data_dir == self.output_dir {
            return Err(CatalogError::validation(format!(
                "output directory {} is the data directory",
                self.output_dir.display()
            )));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file in the current working directory.
pub fn config_file_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| CatalogError::io(".", e))?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Load the application config. Returns defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| CatalogError::config(format!("failed to parse {}: {e}", path.display())))?;
    config.paths.check()?;

    Ok(config)
}

/// Write a default config file at `path`, refusing to overwrite.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(CatalogError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| CatalogError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
