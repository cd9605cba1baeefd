//! Configuration management for the schema builder
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-builder.toml)
//! - Environment variables (SCHEMA_BUILDER_*)
//!
//! ## Example config file (schema-builder.toml):
//! ```toml
//! [arena]
//! initial_capacity = 256
//!
//! [render]
//! output_format = "pretty"
//! max_depth = 512
//! dialect = "https://json-schema.org/draft/2020-12/schema"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// `$schema` URI of JSON Schema draft 2020-12
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Nesting levels rendered before giving up
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Main configuration for the schema builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Arena settings
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,
}

/// Arena configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Node slots reserved up front
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Dialect written to `$schema` by `SchemaBuilder::root`
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Deepest nesting rendered; deeper trees are an error
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pretty,
    #[default]
    Compact,
}

fn default_initial_capacity() -> usize {
    64
}

fn default_dialect() -> String {
    DRAFT_2020_12.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Compact,
            dialect: default_dialect(),
            max_depth: default_max_depth(),
        }
    }
}

impl BuilderConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-builder.toml",
            ".schema-builder.toml",
            "config/schema-builder.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-builder") {
            let xdg_config = config_dir.config_dir().join("schema-builder.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_BUILDER_RENDER__OUTPUT_FORMAT=pretty
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_BUILDER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuilderConfig::default();
        assert_eq!(config.arena.initial_capacity, 64);
        assert_eq!(config.render.output_format, OutputFormat::Compact);
        assert_eq!(config.render.dialect, DRAFT_2020_12);
        assert_eq!(config.render.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_serialize_config() {
        let config = BuilderConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[arena]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("output_format = \"compact\""));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        let mut config = BuilderConfig::default();
        config.arena.initial_capacity = 512;
        config.render.output_format = OutputFormat::Pretty;
        config.render.max_depth = 32;
        config.save(&path).unwrap();

        let loaded = BuilderConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.arena.initial_capacity, 512);
        assert_eq!(loaded.render.output_format, OutputFormat::Pretty);
        assert_eq!(loaded.render.max_depth, 32);
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(BuilderConfig::load_from(path.to_str()).is_err());
    }
}
