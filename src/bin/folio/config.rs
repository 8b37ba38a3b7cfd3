use std::env;
use std::path::PathBuf;

use folio::config::{find_config_path, read_config, Config};
use folio::logger::default_log_location;

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(find_config_path) {
        None => return Err("Could not find folio configuration".to_string()),
        Some(x) => x,
    };

    if let Ok(cur_dir) = env::current_dir() {
        println!("Current dir: {}", cur_dir.display());
    }
    println!("Reading config from {}", config_path.display());
    let mut config = read_config(&config_path).map_err(|e| e.to_string())?;

    if let Some(ref mut log) = config.log {
        if log.location.is_none() {
            log.location = default_log_location("server.log");
        }
        match log.location {
            Some(ref location) => println!("Log enabled. Files will be written in {}", location.display()),
            None => println!("Log enabled. No cache directory found, using the console"),
        }
    } else {
        println!("Log disabled. Using stdout");
    }

    Ok(config)
}
