use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Weekday;

/// The weekday on which every calendar grid row begins, as an ISO weekday
/// number (Monday = 1, Sunday = 7)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize)]
#[serde(try_from = "u8")]
pub(crate) struct FirstDayOfWeek(Weekday);

impl FirstDayOfWeek {
    pub(crate) const MONDAY: FirstDayOfWeek = FirstDayOfWeek(Weekday::Monday);

    pub(crate) fn weekday(self) -> Weekday {
        self.0
    }

    pub(crate) fn number(self) -> u8 {
        self.0.number_from_monday()
    }

    /// The weekday immediately preceding this one, i.e., the last column of
    /// the grid
    pub(crate) fn last_day(self) -> Weekday {
        self.0.previous()
    }
}

impl Default for FirstDayOfWeek {
    fn default() -> FirstDayOfWeek {
        FirstDayOfWeek::MONDAY
    }
}

impl TryFrom<u8> for FirstDayOfWeek {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<FirstDayOfWeek, ConfigError> {
        let wd = match value {
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            6 => Weekday::Saturday,
            7 => Weekday::Sunday,
            n => return Err(ConfigError::FirstDayOutOfRange(n)),
        };
        Ok(FirstDayOfWeek(wd))
    }
}

impl fmt::Display for FirstDayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.0)
    }
}

/// Site-wide settings read once at startup and passed explicitly to whatever
/// needs them
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SiteConfig {
    #[serde(default)]
    pub(crate) week_starts: FirstDayOfWeek,

    /// Localisation override file.  Relative paths are resolved against the
    /// directory containing the configuration file.
    #[serde(default)]
    pub(crate) lang: Option<PathBuf>,
}

impl SiteConfig {
    pub(crate) fn from_toml(s: &str) -> Result<SiteConfig, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Parse)
    }

    pub(crate) fn from_file<P: AsRef<Path>>(path: P) -> Result<SiteConfig, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let mut config = SiteConfig::from_toml(&content)?;
        if let Some(lang) = config.lang.take() {
            config.lang = Some(match path.parent() {
                Some(dir) if lang.is_relative() => dir.join(lang),
                _ => lang,
            });
        }
        tracing::debug!(path = %path.display(), week_starts = %config.week_starts, "Loaded site configuration");
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file")]
    Read(#[source] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[source] toml::de::Error),
    #[error("first day of week must be between 1 (Monday) and 7 (Sunday), got {0}")]
    FirstDayOutOfRange(u8),
}
