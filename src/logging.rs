use std::{env, fs::File, path::PathBuf};

use color_eyre::{Result, eyre::Context};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Environment variable enabling the logs with a custom filter, even if disabled on the config
pub const LOG_ENV: &str = "ETHW_LOG";

const LOG_FILE_NAME: &str = "ethw.log";

/// Log file location and filter, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub path: PathBuf,
    /// `None` when logging is disabled
    pub filter: Option<String>,
}

impl LogSettings {
    /// Reads the settings from the config, [LOG_ENV] takes precedence over it
    pub fn from_config(config: &Config) -> Self {
        Self::resolve(config, env::var(LOG_ENV).ok())
    }

    fn resolve(config: &Config, env_filter: Option<String>) -> Self {
        let filter = match env_filter {
            Some(filter) => Some(filter),
            None if config.logs.enabled => Some(config.logs.filter.clone()),
            None => None,
        };
        Self {
            path: config.data_dir.join(LOG_FILE_NAME),
            filter,
        }
    }

    pub fn enabled(&self) -> bool {
        self.filter.is_some()
    }

    /// Installs the global subscriber writing into the log file.
    ///
    /// Nothing is installed when disabled. The terminal output belongs to the processes, so logs never go to stdout or
    /// stderr.
    pub fn init(&self) -> Result<()> {
        let Some(filter) = &self.filter else {
            return Ok(());
        };
        let env_filter = EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .parse(filter)
            .wrap_err_with(|| format!("Couldn't parse the log filter: {filter}"))?;
        let log_file = File::create(&self.path)
            .wrap_err_with(|| format!("Couldn't create the log file: {}", self.path.display()))?;

        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter);
        tracing_subscriber::registry()
            .with(file_layer)
            .with(ErrorLayer::default())
            .init();
        Ok(())
    }
}
