//! Resolution of the node configuration from flags and configuration file

use std::collections::HashMap;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use crate::cli::{self, split_tags_flag};
use crate::config::ConfigManager;
use crate::node::NodeConfig;
use crate::plugin::{self, PluginFlags, SchemeRegistry};

/// Combine plugin flags, preferring command-line values over file values.
///
/// Boolean flags can only be switched on, so they are ORed.
pub fn merge_plugin_flags(cli: PluginFlags, file: PluginFlags) -> PluginFlags {
    PluginFlags {
        settings: cli.settings.or(file.settings),
        skip_verify: cli.skip_verify || file.skip_verify,
        local_verify: cli.local_verify || file.local_verify,
        public_key: cli.public_key.or(file.public_key),
    }
}

/// Build the node configuration with the default settings sources
pub fn build_node_config(args: &cli::Args, config: &ConfigManager) -> Result<NodeConfig> {
    build_node_config_with(args, config, &SchemeRegistry::with_defaults())
}

pub fn build_node_config_with(
    args: &cli::Args,
    config: &ConfigManager,
    registry: &SchemeRegistry,
) -> Result<NodeConfig> {
    let mut node = NodeConfig::default();

    if let Some(data_dir) = args.data_dir.clone().or_else(|| config.get_path("node", "datadir")) {
        node.data_dir = data_dir;
    }

    node.immutability_threshold = match args.immutability_threshold {
        Some(threshold) => threshold,
        None => config
            .get_u64("node", "immutabilitythreshold")?
            .unwrap_or(node.immutability_threshold),
    };
    debug!("Immutability threshold: {}", node.immutability_threshold);

    let tags = args
        .influxdb_tags
        .clone()
        .or_else(|| config.get_value("metrics", "influxdb-tags").cloned());
    if let Some(tags) = tags {
        node.metrics.influxdb_tags = split_tags_flag(&tags);
        if tags_discarded(&tags, &node.metrics.influxdb_tags) {
            warn!("Ignoring malformed InfluxDB tags: {}", tags);
        }
    }

    let file_flags = config
        .get_plugin_flags()
        .context("Invalid [plugins] section in configuration")?;
    let flags = merge_plugin_flags(args.plugin_flags(), file_flags);
    plugin::set_plugins_with(&flags, &mut node, registry)?;

    if let Some(base_dir) = node.plugins_base_dir() {
        info!("Plugins enabled, base directory: {}", base_dir.display());
    }

    Ok(node)
}

/// True when a tag string had content but parsed to nothing
fn tags_discarded(raw: &str, tags: &HashMap<String, String>) -> bool {
    tags.is_empty() && raw.split(',').any(|segment| !segment.is_empty())
}

/// TOML has no null, so drop null members and elements from plugin configs
fn strip_nulls(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        serde_json::Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

/// Render the resolved configuration as `toml` or `json`
pub fn render_node_config(node: &NodeConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "toml" => {
            let mut value = serde_json::to_value(node).context("Failed to render configuration as TOML")?;
            strip_nulls(&mut value);
            toml::to_string_pretty(&value).context("Failed to render configuration as TOML")
        }
        "json" => serde_json::to_string_pretty(node).context("Failed to render configuration as JSON"),
        other => Err(anyhow::anyhow!("Invalid dump format '{}'. Valid options: toml, json", other)),
    }
}

/// Resolve and print the node configuration
pub fn run(args: &cli::Args, config: &ConfigManager) -> Result<()> {
    info!("Resolving node configuration");
    let node = build_node_config(args, config)?;
    println!("{}", render_node_config(&node, &args.dump_format)?);
    Ok(())
}
