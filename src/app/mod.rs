//! Application orchestration module

pub mod initialization;
pub mod execution;

pub use initialization::{load_configuration, configure_logging};
pub use execution::{build_node_config, merge_plugin_flags, render_node_config, run};
