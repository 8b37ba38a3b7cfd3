use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spdlog::{info, warn};

use folio::config::CFG_FILE_NAME;
use folio::logger::configure_logger;
use folio::server::server_run;

use crate::config::open_config;
use crate::config_data::write_sample_cfg;

mod config;
mod config_data;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Writes a sample configuration to the config path (or ./folio.toml) and exits
    #[arg(long)]
    init: bool,
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    if args.init {
        let target = config_path.unwrap_or_else(|| PathBuf::from(CFG_FILE_NAME));
        if target.exists() {
            eprintln!("{} already exists, not overwriting it", target.display());
            return Ok(());
        }
        write_sample_cfg(&target)
            .with_context(|| format!("Could not write sample configuration to {}", target.display()))?;
        println!("Sample configuration written to {}", target.display());
        return Ok(());
    }

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run folio --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting folio =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    info!("Listening on {}:{}", config.server.address, config.server.port);

    server_run(config).await.context("Server stopped with an error")
}
