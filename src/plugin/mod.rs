//! Plugin Settings Module
//!
//! Validates the `--plugins*` flags and loads the plugin settings payload
//! into the node configuration.
//!
//! # Example Usage
//!
//! ```no_run
//! use nodeflags::node::NodeConfig;
//! use nodeflags::plugin::{set_plugins, PluginFlags};
//!
//! let flags = PluginFlags {
//!     settings: Some("file:///etc/node/plugins.json".to_string()),
//!     ..Default::default()
//! };
//! let mut config = NodeConfig::default();
//! set_plugins(&flags, &mut config)?;
//! assert!(config.plugins.is_some());
//! # Ok::<(), nodeflags::plugin::PluginError>(())
//! ```

pub mod error;
pub mod settings;
pub mod source;
pub mod setup;

pub use error::{PluginError, PluginResult};
pub use settings::{CentralConfig, PluginDefinition, PluginSettings};
pub use source::{FileSource, SchemeRegistry, SettingsSource};
pub use setup::{set_plugins, set_plugins_with, PluginFlags};
