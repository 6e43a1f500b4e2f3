//! Configuration management for the interface generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (interfaces.toml)
//! - Environment variables (INTERFACES__*)
//!
//! Command line flags of the binary override everything loaded here.
//!
//! ## Example config file (interfaces.toml):
//! ```toml
//! [output]
//! prefix = "app_"
//! dir = "generated"
//!
//! [schema]
//! extension = "json"
//! apply_defaults = true
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen;
use crate::error::Result;
use crate::loader::LoadConfig;

/// Main configuration for the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Interface file settings
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix of the generated file names
    #[serde(default)]
    pub prefix: String,

    /// Output directory (defaults to the interface directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Interface file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Extension of interface files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Fill in Astarte defaults for omitted optional fields
    #[serde(default)]
    pub apply_defaults: bool,
}

fn default_extension() -> String {
    "json".to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            apply_defaults: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "interfaces.toml",
            ".interfaces.toml",
            "config/interfaces.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "astarte", "interfaces") {
            let xdg_config = config_dir.config_dir().join("interfaces.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // INTERFACES__OUTPUT__PREFIX, INTERFACES__SCHEMA__APPLY_DEFAULTS, ...
        builder = builder.add_source(
            Environment::with_prefix("INTERFACES")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = self
            .to_toml()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Artifact base name for the configured prefix
    pub fn base_name(&self) -> String {
        codegen::base_name(&self.output.prefix)
    }

    /// Loader settings
    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            extension: self.schema.extension.clone(),
            apply_defaults: self.schema.apply_defaults,
        }
    }
}
