//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, LevelFilter};
use std::str::FromStr;
use crate::{cli, config, logging};

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => level,
            Ok(None) => LevelFilter::Warn,
            Err(e) => {
                debug!("Invalid console-level in config, using default: {}", e);
                LevelFilter::Warn
            }
        }
    };

    // --log-format defaults to "text", so only a non-default value overrides the file
    let format = if args.log_format.to_lowercase() != "text" {
        logging::LogFormat::from_str(&args.log_format).map_err(|e| anyhow::anyhow!(e))?
    } else {
        config
            .get_value("base", "log-format")
            .and_then(|value| logging::LogFormat::from_str(value).ok())
            .unwrap_or(logging::LogFormat::Text)
    };

    let log_file = args.log_file.clone().or_else(|| config.get_path("base", "log-file"));

    let file_level = match &args.log_file_level {
        Some(level) => Some(logging::parse_log_level(level)?),
        None => config
            .get_log_level("base", "file-log-level")
            .context("Invalid file-log-level in configuration")?,
    };

    // --quiet with a log file sends everything to the file only
    let (destination, file_level) = match log_file {
        Some(path) if args.quiet => (logging::LogDestination::File(path), Some(file_level.unwrap_or(LevelFilter::Info))),
        Some(path) => (logging::LogDestination::Both(path), Some(file_level.unwrap_or(console_level))),
        None if file_level.is_some() => {
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
        None => (logging::LogDestination::Console, None),
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn manager(entries: &[(&str, &str, &str)]) -> config::ConfigManager {
        let mut configuration = config::Configuration::new();
        for (section, key, value) in entries {
            configuration
                .entry(section.to_string())
                .or_insert_with(HashMap::new)
                .insert(key.to_string(), value.to_string());
        }
        config::ConfigManager::from_config(configuration)
    }

    #[test]
    fn test_cli_level_flags_win() {
        let args = cli::Args::try_parse_from(["nodeflags", "--verbose"]).unwrap();
        let log_config = configure_logging(&args, &manager(&[("base", "console-level", "error")])).unwrap();
        assert_eq!(log_config.console_level, LevelFilter::Debug);
    }

    #[test]
    fn test_config_file_level_and_format() {
        let args = cli::Args::try_parse_from(["nodeflags"]).unwrap();
        let log_config = configure_logging(
            &args,
            &manager(&[("base", "console-level", "info"), ("base", "log-format", "json")]),
        ).unwrap();
        assert_eq!(log_config.console_level, LevelFilter::Info);
        assert_eq!(log_config.format, logging::LogFormat::Json);
        assert_eq!(log_config.destination, logging::LogDestination::Console);
    }

    #[test]
    fn test_log_file_inherits_console_level() {
        let args = cli::Args::try_parse_from(["nodeflags", "--verbose", "--log-file", "/tmp/node.log"]).unwrap();
        let log_config = configure_logging(&args, &manager(&[])).unwrap();
        assert_eq!(log_config.destination, logging::LogDestination::Both(PathBuf::from("/tmp/node.log")));
        assert_eq!(log_config.file_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn test_quiet_with_log_file_is_file_only() {
        let args = cli::Args::try_parse_from(["nodeflags", "--quiet", "--log-file", "/tmp/node.log"]).unwrap();
        let log_config = configure_logging(&args, &manager(&[])).unwrap();
        assert_eq!(log_config.destination, logging::LogDestination::File(PathBuf::from("/tmp/node.log")));
        assert_eq!(log_config.file_level, Some(LevelFilter::Info));

        let args = cli::Args::try_parse_from([
            "nodeflags", "--quiet", "--log-file", "/tmp/node.log", "--log-file-level", "debug",
        ]).unwrap();
        let log_config = configure_logging(&args, &manager(&[])).unwrap();
        assert_eq!(log_config.file_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn test_invalid_file_log_level_in_config_is_rejected() {
        let args = cli::Args::try_parse_from(["nodeflags", "--log-file", "/tmp/node.log"]).unwrap();
        let err = configure_logging(&args, &manager(&[("base", "file-log-level", "loud")])).unwrap_err();
        assert!(err.to_string().contains("file-log-level"), "error: {}", err);
    }
}
