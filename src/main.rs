use anyhow::Result;
use std::process;
use log::error;
use nodeflags::{app, cli, logging};

fn main() {
    if let Err(e) = run() {
        error!("Startup aborted: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::args::parse_args();

    cli::args::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    app::run(&args, &config_manager)
}
