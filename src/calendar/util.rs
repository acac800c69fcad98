use std::iter::successors;
use time::{Date, Duration, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    /// Number of days from `first` forwards to `self`, in `0..7`
    fn days_since(&self, first: Weekday) -> u8;
}

impl WeekdayExt for Weekday {
    fn days_since(&self, first: Weekday) -> u8 {
        (self.number_days_from_monday() + 7 - first.number_days_from_monday()) % 7
    }
}

/// The seven weekdays in order, starting from a given day and wrapping past
/// Sunday
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekdayIter {
    next: Option<Weekday>,
    first: Weekday,
}

impl WeekdayIter {
    pub(crate) fn starting(first: Weekday) -> Self {
        WeekdayIter {
            next: Some(first),
            first,
        }
    }
}

impl Iterator for WeekdayIter {
    type Item = Weekday;

    fn next(&mut self) -> Option<Weekday> {
        let r = self.next;
        if let Some(wd) = r {
            let wd = wd.next();
            self.next = (wd != self.first).then_some(wd);
        }
        r
    }
}

pub(crate) fn first_of_month(date: Date) -> Date {
    n_days_before(date, date.day() - 1)
}

pub(crate) fn last_of_month(date: Date) -> Date {
    iter_days_from(date)
        .take_while(|d| d.month() == date.month())
        .last()
        .unwrap_or(date)
}

/// The latest date on or before `date` that falls on `wd`
pub(crate) fn on_or_before(date: Date, wd: Weekday) -> Date {
    n_days_before(date, date.weekday().days_since(wd))
}

/// The earliest date on or after `date` that falls on `wd`
pub(crate) fn on_or_after(date: Date, wd: Weekday) -> Date {
    n_days_after(date, wd.days_since(date.weekday()))
}

/// Advance by one calendar month, keeping the day of the month.  When the
/// following month is too short for that day, the excess days spill over into
/// the month after, so 31 January becomes 3 March (2 March in leap years).
///
/// Returns `None` at the end of time.
pub(crate) fn add_one_month(date: Date) -> Option<Date> {
    let next_first = last_of_month(date).next_day()?;
    next_first.checked_add(Duration::days(i64::from(date.day()) - 1))
}

pub(crate) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

fn n_days_after(date: Date, n: u8) -> Date {
    date.checked_add(Duration::days(n.into()))
        .expect("Reached end of calendar")
}

fn n_days_before(date: Date, n: u8) -> Date {
    date.checked_sub(Duration::days(n.into()))
        .expect("Reached beginning of calendar")
}
