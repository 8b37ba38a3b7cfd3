use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Log, LogLevel};

pub const LOG_RETENTION_DAYS: usize = 60;

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// Where log files go when the config does not say.
pub fn default_log_location(file_name: &str) -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("folio").join("log").join(file_name))
}

fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let stdout = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(Level::Warn))
        .build()?);

    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
        .build()?);

    builder.sink(stdout).sink(stderr);

    Ok(())
}

fn daily_file_sink(location: &Path) -> spdlog::Result<Arc<RotatingFileSink>> {
    Ok(Arc::new(RotatingFileSink::builder()
        .base_path(location)
        .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
        .max_files(LOG_RETENTION_DAYS)
        .rotate_on_open(false)
        .build()?))
}

/// Replaces the default console logger with a daily rotating file logger.
/// Without a `[log]` section the default logger is kept.
pub fn configure_logger(log: Option<&Log>) -> spdlog::Result<()> {
    let Some(log) = log else {
        return Ok(());
    };

    let mut builder = Logger::builder();
    if let Some(ref location) = log.location {
        builder.sink(daily_file_sink(location)?);
    }
    if log.log_to_console || log.location.is_none() {
        add_console_sinks(&mut builder)?;
    }

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(log.level.into()));

    spdlog::set_default_logger(logger);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(Level::from(LogLevel::Critical), Level::Critical);
        assert_eq!(Level::from(LogLevel::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevel::Trace), Level::Trace);
    }

    #[test]
    fn test_no_log_section_keeps_default() {
        assert!(configure_logger(None).is_ok());
    }

    #[test]
    fn test_default_location() {
        if let Some(path) = default_log_location("server.log") {
            assert!(path.ends_with("folio/log/server.log"));
        }
    }
}
