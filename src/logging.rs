use std::fs::{self, OpenOptions};

use color_eyre::eyre::{Result, WrapErr};
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Config;

/// Append log records to `<data_dir>/calendar-widget.log`; the terminal
/// belongs to the UI.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)
        .wrap_err_with(|| format!("failed to create {}", config.data_dir.display()))?;

    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let log_config = ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Error)
        .set_time_format_rfc3339()
        .build();

    WriteLogger::init(config.log_level, log_config, file)
        .wrap_err("failed to install logger")?;
    Ok(())
}
