use crate::colour::Colour;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use std::iter::successors;
use time::{Date, Duration};

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub(crate) struct WeekId(pub(crate) u32);

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WeekId {
    fn from(n: u32) -> WeekId {
        WeekId(n)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub(crate) struct HolidayId(pub(crate) u32);

impl From<u32> for HolidayId {
    fn from(n: u32) -> HolidayId {
        HolidayId(n)
    }
}

/// What is known about a single date of the year
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
pub(crate) struct DateEntry {
    #[serde(with = "ymd")]
    pub(crate) date: Date,
    #[serde(default, deserialize_with = "optional_id")]
    pub(crate) holiday_id: Option<HolidayId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub(crate) week_id: Option<WeekId>,
}

/// An academic year's date range together with its per-date assignments.
///
/// The start date is never after the end date, and the month grids covering
/// the year (padded to whole weeks) fit within the representable calendar.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(try_from = "AcademicYearRecord")]
pub(crate) struct AcademicYear {
    date_start: Date,
    date_end: Date,
    dates: Vec<DateEntry>,
}

impl AcademicYear {
    pub(crate) fn new(
        date_start: Date,
        date_end: Date,
        dates: Vec<DateEntry>,
    ) -> Result<AcademicYear, DataError> {
        if date_start > date_end {
            return Err(DataError::InvertedRange {
                start: date_start,
                end: date_end,
            });
        }
        if !grids_fit(date_start, date_end) {
            return Err(DataError::BeyondCalendar {
                start: date_start,
                end: date_end,
            });
        }
        Ok(AcademicYear {
            date_start,
            date_end,
            dates,
        })
    }

    pub(crate) fn date_start(&self) -> Date {
        self.date_start
    }

    pub(crate) fn date_end(&self) -> Date {
        self.date_end
    }

    pub(crate) fn dates(&self) -> &[DateEntry] {
        &self.dates
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        (self.date_start..=self.date_end).contains(&date)
    }
}

// A month grid reaches back up to six days before the first of its month and
// forwards up to six days after the last.
fn grids_fit(start: Date, end: Date) -> bool {
    let pad = Duration::days(6);
    let first_of_start = start
        .replace_day(1)
        .ok()
        .and_then(|d| d.checked_sub(pad));
    let last_of_end = successors(Some(end), |d| d.next_day())
        .take_while(|d| d.month() == end.month())
        .last()
        .and_then(|d| d.checked_add(pad));
    first_of_start.is_some() && last_of_end.is_some()
}

#[derive(Deserialize)]
struct AcademicYearRecord {
    #[serde(with = "ymd")]
    date_start: Date,
    #[serde(with = "ymd")]
    date_end: Date,
    #[serde(default)]
    dates: Vec<DateEntry>,
}

impl TryFrom<AcademicYearRecord> for AcademicYear {
    type Error = DataError;

    fn try_from(value: AcademicYearRecord) -> Result<AcademicYear, DataError> {
        AcademicYear::new(value.date_start, value.date_end, value.dates)
    }
}

/// A coloured range of weeks that dates can be assigned to
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub(crate) struct Week {
    #[serde(rename = "week_id")]
    pub(crate) id: WeekId,
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) colour: Colour,
}

/// Snapshot of one academic year and its week ranges as exported by the
/// booking database
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub(crate) struct YearFile {
    pub(crate) year: AcademicYear,
    #[serde(default)]
    pub(crate) weeks: Vec<Week>,
}

impl YearFile {
    pub(crate) fn from_json(s: &str) -> Result<YearFile, DataError> {
        serde_json::from_str(s).map_err(DataError::Parse)
    }

    pub(crate) fn from_file<P: AsRef<Path>>(path: P) -> Result<YearFile, DataError> {
        let content = fs::read_to_string(path).map_err(DataError::Read)?;
        let data = YearFile::from_json(&content)?;
        tracing::debug!(
            start = %data.year.date_start,
            end = %data.year.date_end,
            dates = data.year.dates.len(),
            weeks = data.weeks.len(),
            "Loaded academic year"
        );
        Ok(data)
    }
}

#[derive(Debug, Error)]
pub(crate) enum DataError {
    #[error("failed to read year file")]
    Read(#[source] std::io::Error),
    #[error("failed to parse year file")]
    Parse(#[source] serde_json::Error),
    #[error("academic year starts ({start}) after it ends ({end})")]
    InvertedRange { start: Date, end: Date },
    #[error("academic year {start} to {end} is too close to the limits of the calendar")]
    BeyondCalendar { start: Date, end: Date },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(u32),
    Text(String),
}

// The database hands out ids as numbers, numeric strings, empty strings or
// nulls; the last two both mean "unassigned".
fn optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u32>,
{
    match Option::<IdRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdRepr::Number(n)) => Ok(Some(T::from(n))),
        Some(IdRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(IdRepr::Text(s)) => s
            .trim()
            .parse::<u32>()
            .map(|n| Some(T::from(n)))
            .map_err(serde::de::Error::custom),
    }
}
