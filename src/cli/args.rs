use clap::Parser;
use anyhow::Result;
use std::path::PathBuf;
use log::{debug, info};

use crate::plugin::PluginFlags;

/// Node plugin and metrics flag resolver
#[derive(Parser, Debug)]
#[command(name = "nodeflags")]
#[command(about = "Validates a node's plugin and metrics flags and prints the resulting configuration")]
#[command(version)]
pub struct Args {
    /// Data directory for the node
    #[arg(long = "datadir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    // ============ PLUGIN FLAGS ============

    /// URL of the plugin settings JSON (e.g. file:///etc/node/plugins.json)
    #[arg(long = "plugins", value_name = "URL")]
    pub plugins: Option<String>,

    /// Skip plugin integrity verification
    #[arg(long = "plugins.skipverify")]
    pub plugins_skip_verify: bool,

    /// Verify plugin integrity against a local public key
    #[arg(long = "plugins.localverify")]
    pub plugins_local_verify: bool,

    /// Public key file used with --plugins.localverify
    #[arg(long = "plugins.publickey", value_name = "FILE")]
    pub plugins_public_key: Option<String>,

    // ============ NODE FLAGS ============

    /// Block depth beyond which block data moves to the ancient store
    #[arg(long = "immutabilitythreshold", value_name = "N")]
    pub immutability_threshold: Option<u64>,

    /// Comma-separated key=value tags attached to all InfluxDB measurements
    #[arg(long = "metrics.influxdb.tags", value_name = "TAGS")]
    pub influxdb_tags: Option<String>,

    // ============ LOGGING ============

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    // ============ CONFIGURATION ============

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,

    /// Output format for the resolved configuration: toml or json
    #[arg(long, value_name = "FORMAT", default_value = "toml")]
    pub dump_format: String,
}

impl Args {
    /// Plugin flag values as given on the command line
    pub fn plugin_flags(&self) -> PluginFlags {
        PluginFlags {
            settings: self.plugins.clone(),
            skip_verify: self.plugins_skip_verify,
            local_verify: self.plugins_local_verify,
            public_key: self.plugins_public_key.clone(),
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    debug!("Parsing command line arguments");
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {},
        _ => return Err(anyhow::anyhow!(
            "Invalid log format '{}'. Valid options: text, json", args.log_format
        )),
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    match args.dump_format.to_lowercase().as_str() {
        "toml" | "json" => {},
        _ => return Err(anyhow::anyhow!(
            "Invalid dump format '{}'. Valid options: toml, json", args.dump_format
        )),
    }

    info!("CLI arguments validated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::parser::ValueSource;
    use clap::CommandFactory;

    /// Create Args with default values for testing
    fn create_test_args() -> Args {
        Args {
            data_dir: None,
            plugins: None,
            plugins_skip_verify: false,
            plugins_local_verify: false,
            plugins_public_key: None,
            immutability_threshold: None,
            influxdb_tags: None,
            verbose: false,
            quiet: false,
            debug: false,
            log_format: "text".to_string(),
            log_file: None,
            log_file_level: None,
            config_file: None,
            config_name: None,
            dump_format: "toml".to_string(),
        }
    }

    #[test]
    fn test_validate_args_success() {
        let args = Args {
            verbose: true,
            log_format: "json".to_string(),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_conflicting_flags() {
        let args = Args {
            verbose: true,
            quiet: true,
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_format() {
        let args = Args {
            log_format: "invalid".to_string(),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_file_level_without_file() {
        let args = Args {
            log_file_level: Some("debug".to_string()),
            ..create_test_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_dump_format() {
        let args = Args {
            dump_format: "yaml".to_string(),
            ..create_test_args()
        };
        let err = validate_args(&args).unwrap_err();
        assert!(err.to_string().contains("Invalid dump format"));
    }

    #[test]
    fn test_dotted_plugin_flags_parse() {
        let args = Args::try_parse_from([
            "nodeflags",
            "--plugins", "file:///etc/node/plugins.json",
            "--plugins.localverify",
            "--plugins.publickey", "/etc/node/gpg.key",
        ]).unwrap();

        let flags = args.plugin_flags();
        assert_eq!(flags.settings.as_deref(), Some("file:///etc/node/plugins.json"));
        assert!(flags.local_verify);
        assert!(!flags.skip_verify);
        assert_eq!(flags.public_key.as_deref(), Some("/etc/node/gpg.key"));
    }

    #[test]
    fn test_plugin_flags_default_to_disabled() {
        let args = Args::try_parse_from(["nodeflags"]).unwrap();
        assert_eq!(args.plugin_flags(), PluginFlags::default());
        assert!(args.immutability_threshold.is_none());
        assert!(args.influxdb_tags.is_none());
    }

    #[test]
    fn test_set_immutability_threshold() {
        let threshold = 100000.to_string();
        let argv = ["nodeflags", "--immutabilitythreshold", threshold.as_str()];

        let matches = Args::command().try_get_matches_from(argv).unwrap();
        assert_eq!(
            matches.value_source("immutability_threshold"),
            Some(ValueSource::CommandLine),
            "immutability threshold flag not set"
        );
        assert_eq!(
            matches.get_one::<u64>("immutability_threshold").copied(),
            Some(100000),
            "immutability threshold value not set"
        );

        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.immutability_threshold, Some(100000));
    }

    #[test]
    fn test_immutability_threshold_rejects_non_integer() {
        let result = Args::try_parse_from(["nodeflags", "--immutabilitythreshold", "lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_influxdb_tags_kept_raw() {
        let args = Args::try_parse_from([
            "nodeflags", "--metrics.influxdb.tags", "host=localhost,region=eu",
        ]).unwrap();
        assert_eq!(args.influxdb_tags.as_deref(), Some("host=localhost,region=eu"));
    }
}
