use std::path::{Path, PathBuf};

use chrono::Weekday;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;
use serde::Deserialize;

use crate::theme::{Theme, ThemeConfig};

pub const APP_NAME: &str = "calendar-widget";

#[derive(Debug, Clone)]
pub struct Config {
    pub week_start: Weekday,
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
    pub theme: Theme,
    /// File the settings were read from, if any.
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            data_dir: default_data_dir(),
            log_level: LevelFilter::Info,
            theme: Theme::default(),
            source: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    week_start: Option<String>,
    data_dir: Option<PathBuf>,
    log_level: Option<String>,
    theme: ThemeConfig,
}

impl Config {
    /// Read `<config_dir>/calendar-widget/config.toml`, or use defaults when
    /// it does not exist.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::default();

        let week_start = match file.week_start.as_deref() {
            Some(name) => name
                .trim()
                .parse::<Weekday>()
                .map_err(|_| eyre!("unknown week_start '{}'", name))?,
            None => defaults.week_start,
        };

        let log_level = match file.log_level.as_deref() {
            Some(level) => level
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| eyre!("unknown log_level '{}'", level))?,
            None => defaults.log_level,
        };

        Ok(Self {
            week_start,
            data_dir: file.data_dir.unwrap_or(defaults.data_dir),
            log_level,
            theme: file.theme.into_theme(),
            source: None,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.log", APP_NAME))
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.week_start, Weekday::Sun);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.theme, Theme::default());
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            week_start = "Monday"
            data_dir = "/tmp/cal"
            log_level = "debug"

            [theme]
            preset = "gruvbox"
            "#,
        )
        .unwrap();

        assert_eq!(config.week_start, Weekday::Mon);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cal"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.theme.name, "gruvbox");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/cal/calendar-widget.log"));
    }

    #[test]
    fn test_short_weekday_names() {
        let config = Config::from_toml("week_start = \"sat\"").unwrap();
        assert_eq!(config.week_start, Weekday::Sat);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_toml("week_start = \"someday\"").is_err());
        assert!(Config::from_toml("log_level = \"loud\"").is_err());
        assert!(Config::from_toml("colour = \"blue\"").is_err());
        assert!(Config::from_toml("week_start = ").is_err());
    }

    #[test]
    fn test_from_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "week_start = \"mon\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.week_start, Weekday::Mon);
    }
}
