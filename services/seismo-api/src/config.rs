//! Service configuration loading and types.

use anyhow::{Context, Result};
use seismo_common::DatabaseMetadata;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_label() -> String {
    "instaseis".to_string()
}

fn default_channel_capacity() -> usize {
    16
}

/// Service configuration loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Filename prefix used when a request has no `label`.
    #[serde(default = "default_label")]
    pub default_label: String,

    /// Number of encoded chunks buffered between the extractor and the
    /// response body.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Static properties of the database being served.
    #[serde(default)]
    pub database: Option<DatabaseMetadata>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_label: default_label(),
            channel_capacity: default_channel_capacity(),
            database: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file does not exist, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config: ServiceConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse: {:?}", path))?;

        if config.channel_capacity == 0 {
            anyhow::bail!("channel_capacity must be at least 1 in {:?}", path);
        }

        tracing::info!(
            path = %path.display(),
            default_label = %config.default_label,
            has_database = config.database.is_some(),
            "Loaded service config"
        );

        Ok(config)
    }

    /// The database metadata, which must be configured to serve anything.
    pub fn database_metadata(&self) -> Result<DatabaseMetadata> {
        self.database
            .clone()
            .context("no `database` section in the service config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(dir.path().join("seismo.yaml")).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.default_label, "instaseis");
        assert_err!(config.database_metadata());
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
default_label: prem
database:
  velocity_model: prem_iso
  planet_radius: 6371000.0
  min_radius: 3480000.0
  max_radius: 6371000.0
  dt: 2.0
  npts: 1801
  src_shift: 30.0
"#
        )
        .unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.default_label, "prem");
        assert_eq!(config.channel_capacity, 16);
        let metadata = assert_ok!(config.database_metadata());
        assert_eq!(metadata.npts, 1801);
        assert_eq!(metadata.source_depth, None);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel_capacity: 0").unwrap();
        assert_err!(ServiceConfig::load(file.path()));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database: [not, a, map]").unwrap();
        assert_err!(ServiceConfig::load(file.path()));
    }
}
