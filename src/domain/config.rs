use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::export::{ClassKeyPolicy, ExportOptions};

/// The generator tag stamped into packages unless configured otherwise.
pub const DEFAULT_GENERATOR: &str = "SpecIFicator";

/// Configuration for exporting hierarchies.
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The generator tag written into exported packages.
    pub generator: String,

    /// Whether to include the metadata closure by default.
    pub include_metadata: bool,

    /// Whether to include statements attached to exported resources by
    /// default.
    pub include_statements: bool,

    /// Whether to include every revision of exported resources by default.
    pub include_revisions: bool,

    /// How revision-unqualified class references are looked up.
    pub class_keys: ClassKeyPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: DEFAULT_GENERATOR.to_string(),
            include_metadata: false,
            include_statements: false,
            include_revisions: false,
            class_keys: ClassKeyPolicy::default(),
        }
    }
}

/// Errors that can occur when reading or writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid TOML for a [`Config`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration at `path`, falling back to the default when
    /// the file is missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The export options described by this configuration.
    #[must_use]
    pub const fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_metadata: self.include_metadata,
            include_statements: self.include_statements,
            include_revisions: self.include_revisions,
            class_keys: self.class_keys,
        }
    }
}
