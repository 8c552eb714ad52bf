//! Node configuration populated from the command line

use std::collections::HashMap;
use std::path::PathBuf;
use serde::Serialize;
use crate::plugin::settings::PluginSettings;

/// Blocks older than this many blocks are moved to the ancient store
pub const DEFAULT_IMMUTABILITY_THRESHOLD: u64 = 3_162_240;

pub const DEFAULT_DATA_DIR: &str = "data";

/// Directory under the data directory holding plugins when no base dir is set
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// Metrics reporting settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsConfig {
    /// Tags attached to every InfluxDB measurement
    pub influxdb_tags: HashMap<String, String>,
}

/// The subset of node configuration this crate is responsible for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeConfig {
    pub data_dir: PathBuf,
    pub immutability_threshold: u64,
    pub metrics: MetricsConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginSettings>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            immutability_threshold: DEFAULT_IMMUTABILITY_THRESHOLD,
            metrics: MetricsConfig::default(),
            plugins: None,
        }
    }
}

impl NodeConfig {
    /// Directory plugins are installed into, if plugins are enabled.
    ///
    /// A relative `baseDir` is taken relative to the data directory.
    pub fn plugins_base_dir(&self) -> Option<PathBuf> {
        let settings = self.plugins.as_ref()?;
        let dir = match settings.base_dir.as_deref() {
            Some(base) if !base.trim().is_empty() => {
                let base = PathBuf::from(base);
                if base.is_absolute() {
                    base
                } else {
                    self.data_dir.join(base)
                }
            }
            _ => self.data_dir.join(DEFAULT_PLUGINS_DIR),
        };
        Some(dir)
    }

    pub fn plugins_enabled(&self) -> bool {
        self.plugins.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.immutability_threshold, 3_162_240);
        assert!(config.metrics.influxdb_tags.is_empty());
        assert!(!config.plugins_enabled());
        assert!(config.plugins_base_dir().is_none());
    }

    #[test]
    fn test_plugins_base_dir_resolution() {
        let mut config = NodeConfig {
            data_dir: PathBuf::from("/var/lib/node"),
            plugins: Some(PluginSettings::default()),
            ..Default::default()
        };
        assert_eq!(config.plugins_base_dir(), Some(PathBuf::from("/var/lib/node/plugins")));

        config.plugins.as_mut().unwrap().base_dir = Some("extensions".to_string());
        assert_eq!(config.plugins_base_dir(), Some(PathBuf::from("/var/lib/node/extensions")));

        config.plugins.as_mut().unwrap().base_dir = Some("/opt/plugins".to_string());
        assert_eq!(config.plugins_base_dir(), Some(PathBuf::from("/opt/plugins")));
    }

    #[test]
    fn test_serializes_without_plugins() {
        let config = NodeConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("plugins").is_none());
        assert_eq!(json["immutability_threshold"], 3_162_240);
    }
}
