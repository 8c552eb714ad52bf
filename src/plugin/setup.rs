//! Plugin flag validation
//!
//! Turns the `--plugins*` flag values into the node's plugin settings.

use std::io::Read;
use log::{debug, info};
use crate::node::NodeConfig;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::settings::PluginSettings;
use crate::plugin::source::SchemeRegistry;

/// Values of the plugin flags for one validation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginFlags {
    /// `--plugins`: URL of the plugin settings payload
    pub settings: Option<String>,
    /// `--plugins.skipverify`
    pub skip_verify: bool,
    /// `--plugins.localverify`
    pub local_verify: bool,
    /// `--plugins.publickey`
    pub public_key: Option<String>,
}

impl PluginFlags {
    /// Check the flag combination without touching the settings source
    pub fn validate(&self) -> PluginResult<()> {
        if self.skip_verify && self.local_verify {
            return Err(PluginError::ConflictingFlags);
        }
        if self.public_key.is_some() && !self.local_verify {
            return Err(PluginError::MissingDependency);
        }
        Ok(())
    }
}

/// Populate `config.plugins` from the flags using the default scheme registry
pub fn set_plugins(flags: &PluginFlags, config: &mut NodeConfig) -> PluginResult<()> {
    set_plugins_with(flags, config, &SchemeRegistry::with_defaults())
}

/// Populate `config.plugins` from the flags, resolving the settings URL
/// through `registry`.
///
/// Plugins are opt-in: without `--plugins` this is a no-op. On any error
/// `config.plugins` is left untouched.
pub fn set_plugins_with(
    flags: &PluginFlags,
    config: &mut NodeConfig,
    registry: &SchemeRegistry,
) -> PluginResult<()> {
    let Some(raw_url) = flags.settings.as_deref() else {
        debug!("No plugin settings given, plugins disabled");
        return Ok(());
    };

    flags.validate()?;

    let (url, mut reader) = registry.open(raw_url)?;
    let mut payload = Vec::new();
    reader
        .read_to_end(&mut payload)
        .map_err(|e| PluginError::io_failure(format!("read {}: {}", url, e)))?;

    let mut settings = PluginSettings::from_slice(&payload)?;
    settings.apply_defaults();
    settings.source = Some(url.to_string());
    settings.skip_verify = flags.skip_verify;
    settings.local_verify = flags.local_verify;
    settings.public_key = flags.public_key.clone();

    info!(
        "Loaded plugin settings from {} ({} providers)",
        url,
        settings.providers.len()
    );
    config.plugins = Some(settings);
    Ok(())
}
