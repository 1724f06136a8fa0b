// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration.
//!
//! Settings for each stage of the pipeline:
//! - Catalog scanning (kind name prefixes, skipped kinds)
//! - Materialization (frames)
//! - Layout (margins and spacing)
//!
//! Stored as RON; every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Catalog scanning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Prefixes stripped from host kind names to form short names, first match wins
    pub strip_prefixes: Vec<String>,
    /// Host kinds left out of the catalog
    pub skip_kinds: Vec<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            strip_prefixes: vec!["ShaderNode".to_string(), "Node".to_string()],
            skip_kinds: vec![crate::kinds::GROUP_KIND.to_string()],
        }
    }
}

impl CatalogSettings {
    /// Short name of a host kind
    pub fn short_name(&self, kind: &str) -> String {
        self.strip_prefixes
            .iter()
            .find_map(|prefix| kind.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(kind)
            .to_string()
    }
}

/// Materialization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Materialize frames referenced by generated nodes and parent nodes to them
    pub materialize_frames: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            materialize_frames: true,
        }
    }
}

/// Layout spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Horizontal gap added to the widest node of each column
    pub column_margin: f32,
    /// Vertical gap added below twice a node's height
    pub row_margin: f32,
    /// Vertical step between collapsed nodes when their size is ignored
    pub collapsed_spacing: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            column_margin: 50.0,
            row_margin: 100.0,
            collapsed_spacing: 100.0,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Format version
    pub version: u32,
    /// Catalog scanning
    pub catalog: CatalogSettings,
    /// Materialization
    pub generator: GeneratorSettings,
    /// Layout
    pub layout: LayoutSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            catalog: CatalogSettings::default(),
            generator: GeneratorSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from RON; rejects configurations newer than this build
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;

        // Version check
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&source)?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON could not be written
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Configuration written by a newer format version
    #[error("Configuration version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert_eq!(config.layout.column_margin, 50.0);
        assert!(config.generator.materialize_frames);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = EngineConfig::from_ron_str("(layout: (row_margin: 40.0))").unwrap();
        assert_eq!(config.layout.row_margin, 40.0);
        assert_eq!(config.layout.column_margin, 50.0);
        assert_eq!(config.catalog, CatalogSettings::default());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let source = format!("(version: {})", CONFIG_FORMAT_VERSION + 1);
        assert!(matches!(
            EngineConfig::from_ron_str(&source),
            Err(ConfigError::UnsupportedVersion { found, .. }) if found == CONFIG_FORMAT_VERSION + 1
        ));
        assert!(EngineConfig::from_ron_str(&format!("(version: {CONFIG_FORMAT_VERSION})")).is_ok());
    }

    #[test]
    fn test_serialization() {
        let mut config = EngineConfig::default();
        config.generator.materialize_frames = false;
        let ron_str = config.to_ron().unwrap();
        let loaded = EngineConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_short_names() {
        let settings = CatalogSettings::default();
        assert_eq!(settings.short_name("ShaderNodeMath"), "Math");
        assert_eq!(settings.short_name("NodeGroupInput"), "GroupInput");
        assert_eq!(settings.short_name("CustomKind"), "CustomKind");
        assert_eq!(settings.short_name("Node"), "Node");
    }
}
