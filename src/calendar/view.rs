use super::util::DAYS_IN_WEEK;
use crate::year::WeekId;
use serde::Serialize;
use time::Date;

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

/// Where a grid cell's date lies relative to the month the grid is for
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum MonthPosition {
    PrevMonth,
    Current,
    NextMonth,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct DayCell {
    #[serde(with = "ymd")]
    pub(crate) date: Date,
    pub(crate) position: MonthPosition,
    /// Whether a selectable range may begin at this cell
    pub(crate) range_start: bool,
    /// The date on which this cell's selectable week begins
    #[serde(with = "ymd")]
    pub(crate) week_start: Date,
    /// Set for dates outside the academic year
    pub(crate) disabled: bool,
    pub(crate) week_id: Option<WeekId>,
    pub(crate) holiday: bool,
}

impl DayCell {
    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }

    pub(crate) fn in_month(&self) -> bool {
        self.position == MonthPosition::Current
    }

    pub(crate) fn classes(&self) -> Vec<String> {
        let mut classes = Vec::new();
        match self.position {
            MonthPosition::PrevMonth => classes.push(String::from("prev-month")),
            MonthPosition::NextMonth => classes.push(String::from("next-month")),
            MonthPosition::Current => (),
        }
        if self.range_start {
            classes.push(String::from("range-start"));
        }
        if let Some(week_id) = self.week_id {
            classes.push(String::from("calendar-range"));
            classes.push(format!("week-{week_id}"));
        }
        classes
    }
}

/// Everything needed to draw one month of the academic-year calendar
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct MonthView {
    /// The first of the month this grid is for
    #[serde(with = "ymd")]
    pub(crate) month: Date,
    pub(crate) title: String,
    /// Short weekday labels, one per column
    pub(crate) header: [String; DAYS_IN_WEEK],
    /// Whole weeks of cells, row by row
    pub(crate) days: Vec<DayCell>,
}

impl MonthView {
    pub(crate) fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.days.chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.days
            .iter()
            .any(|cell| cell.in_month() && cell.date == date)
    }
}
