//! Plugin Settings
//!
//! Serde model of the plugin settings payload read from the settings
//! source, plus the verification policy taken from the command line.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::plugin::error::{PluginError, PluginResult};

pub const DEFAULT_PUBLIC_KEY_URI: &str = "/gpg.key";
pub const DEFAULT_DIST_PATH_TEMPLATE: &str =
    "bin/{name}/{version}/{name}-{version}-{os}-{arch}.zip";
pub const DEFAULT_SIG_PATH_TEMPLATE: &str =
    "bin/{name}/{version}/{name}-{version}-{os}-{arch}-sha256.checksum.asc";

/// Settings for the node's plugin subsystem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    /// Directory plugins are unpacked into (relative to the data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,

    /// Central repository plugins are downloaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub central: Option<CentralConfig>,

    /// Plugin provider per interface name
    #[serde(default)]
    pub providers: BTreeMap<String, PluginDefinition>,

    /// URL the settings were read from
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_deserializing)]
    pub skip_verify: bool,

    #[serde(skip_deserializing)]
    pub local_verify: bool,

    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// Location and signing details of the central plugin repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CentralConfig {
    pub cert_fingerprint: String,
    pub base_url: String,
    pub public_key_uri: String,
    pub insecure_skip_tls_verify: bool,
    pub plugin_dist_path_template: String,
    pub plugin_sig_path_template: String,
}

/// A concrete plugin implementing one interface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Plugin-specific configuration, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl PluginDefinition {
    /// Distribution name, `name-version`
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl CentralConfig {
    /// Fill empty fields with the defaults
    pub fn apply_defaults(&mut self) {
        if self.public_key_uri.is_empty() {
            self.public_key_uri = DEFAULT_PUBLIC_KEY_URI.to_string();
        }
        if self.plugin_dist_path_template.is_empty() {
            self.plugin_dist_path_template = DEFAULT_DIST_PATH_TEMPLATE.to_string();
        }
        if self.plugin_sig_path_template.is_empty() {
            self.plugin_sig_path_template = DEFAULT_SIG_PATH_TEMPLATE.to_string();
        }
    }
}

impl PluginSettings {
    /// Decode a settings payload
    pub fn from_json(payload: &str) -> PluginResult<Self> {
        Self::from_slice(payload.as_bytes())
    }

    /// Decode raw bytes read from a settings source. Invalid UTF-8 is a
    /// parse failure like any other malformed payload.
    pub fn from_slice(payload: &[u8]) -> PluginResult<Self> {
        let settings: PluginSettings = serde_json::from_slice(payload)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject provider definitions without a name or version
    pub fn validate(&self) -> PluginResult<()> {
        for (interface, definition) in &self.providers {
            if definition.name.trim().is_empty() {
                return Err(PluginError::invalid_definition(interface, "missing name"));
            }
            if definition.version.trim().is_empty() {
                return Err(PluginError::invalid_definition(interface, "missing version"));
            }
        }
        Ok(())
    }

    /// Ensure a central configuration exists and has no empty fields
    pub fn apply_defaults(&mut self) {
        self.central
            .get_or_insert_with(CentralConfig::default)
            .apply_defaults();
    }

    /// Look up the provider for an interface
    pub fn provider(&self, interface: &str) -> Option<&PluginDefinition> {
        self.providers.get(interface)
    }
}
