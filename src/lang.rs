use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use time::{Month, Weekday};

/// Source of user-facing strings, looked up by key
pub(crate) trait Lang {
    fn line(&self, key: &str) -> Option<&str>;

    /// Like [`Lang::line`], but falls back to the key itself so that a
    /// missing translation is visible instead of blank
    fn text(&self, key: &str) -> Cow<'_, str> {
        match self.line(key) {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(key.to_owned()),
        }
    }
}

impl<T: Lang + ?Sized> Lang for &T {
    fn line(&self, key: &str) -> Option<&str> {
        (**self).line(key)
    }
}

pub(crate) fn month_key(month: Month) -> String {
    format!("month_{}", month.to_string().to_lowercase())
}

pub(crate) fn weekday_short_key(wd: Weekday) -> String {
    format!("day_{}_short", wd.number_from_monday())
}

pub(crate) const LOG_OUT_KEY: &str = "user_action_log_out";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct English;

impl Lang for English {
    fn line(&self, key: &str) -> Option<&str> {
        let s = match key {
            "month_january" => "January",
            "month_february" => "February",
            "month_march" => "March",
            "month_april" => "April",
            "month_may" => "May",
            "month_june" => "June",
            "month_july" => "July",
            "month_august" => "August",
            "month_september" => "September",
            "month_october" => "October",
            "month_november" => "November",
            "month_december" => "December",
            "day_1_short" => "Mon",
            "day_2_short" => "Tue",
            "day_3_short" => "Wed",
            "day_4_short" => "Thu",
            "day_5_short" => "Fri",
            "day_6_short" => "Sat",
            "day_7_short" => "Sun",
            LOG_OUT_KEY => "Log out",
            _ => return None,
        };
        Some(s)
    }
}

/// Translations read from a flat TOML table of `key = "text"` pairs, falling
/// back to [`English`] for anything the file doesn't define
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct LangFile {
    lines: HashMap<String, String>,
}

impl LangFile {
    pub(crate) fn from_toml(s: &str) -> Result<LangFile, LangError> {
        let lines = toml::from_str::<HashMap<String, String>>(s).map_err(LangError::Parse)?;
        Ok(LangFile { lines })
    }

    pub(crate) fn from_file<P: AsRef<Path>>(path: P) -> Result<LangFile, LangError> {
        let content = fs::read_to_string(path).map_err(LangError::Read)?;
        let lang = LangFile::from_toml(&content)?;
        tracing::debug!(lines = lang.lines.len(), "Loaded language file");
        Ok(lang)
    }
}

impl Lang for LangFile {
    fn line(&self, key: &str) -> Option<&str> {
        self.lines
            .get(key)
            .map(String::as_str)
            .or_else(|| English.line(key))
    }
}

#[derive(Debug, Error)]
pub(crate) enum LangError {
    #[error("failed to read language file")]
    Read(#[source] std::io::Error),
    #[error("failed to parse language file")]
    Parse(#[source] toml::de::Error),
}
