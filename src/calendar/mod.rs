mod util;
mod view;
mod widget;
use self::util::{
    add_one_month, first_of_month, iter_days_from, last_of_month, on_or_after, on_or_before,
    WeekdayIter, DAYS_IN_WEEK,
};
pub(crate) use self::view::{DayCell, MonthPosition, MonthView};
pub(crate) use self::widget::{MonthGrid, Palette};
use crate::colour::{contrast_foreground, Blend, ColourOps};
use crate::config::FirstDayOfWeek;
use crate::lang::{month_key, weekday_short_key, Lang};
use crate::template::{JinjaTemplate, TemplateError, TemplateRenderer, CALENDAR_CSS};
use crate::year::{AcademicYear, DateEntry, Week, WeekId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::iter::successors;
use time::{Date, Weekday};

/// Lays an academic year out as month grids whose rows all begin on the
/// configured first day of the week
#[derive(Clone, Debug)]
pub(crate) struct CalendarGrid<L> {
    year: AcademicYear,
    weeks: Vec<Week>,
    first_day: FirstDayOfWeek,
    last_day: Weekday,
    dates_by_key: HashMap<Date, DateEntry>,
    lang: L,
}

impl<L: Lang> CalendarGrid<L> {
    pub(crate) fn new(
        year: AcademicYear,
        weeks: Vec<Week>,
        first_day: FirstDayOfWeek,
        lang: L,
    ) -> Self {
        let mut dates_by_key = HashMap::with_capacity(year.dates().len());
        for entry in year.dates() {
            if dates_by_key.insert(entry.date, *entry).is_some() {
                tracing::warn!(date = %entry.date, "Duplicate entry for date; using the later one");
            }
        }
        tracing::debug!(
            start = %year.date_start(),
            end = %year.date_end(),
            first_day = %first_day,
            dates = dates_by_key.len(),
            "Built calendar grid"
        );
        CalendarGrid {
            year,
            weeks,
            first_day,
            last_day: first_day.last_day(),
            dates_by_key,
            lang,
        }
    }

    pub(crate) fn first_day(&self) -> FirstDayOfWeek {
        self.first_day
    }

    pub(crate) fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// The grid's columns, in order
    pub(crate) fn days_of_week(&self) -> [Weekday; DAYS_IN_WEEK] {
        let mut iter = WeekdayIter::starting(self.first_day().weekday());
        std::array::from_fn(|_| iter.next().expect("WeekdayIter should yield seven days"))
    }

    /// All dates shown on the grid for the month containing `month`: the
    /// month itself, widened at either end to whole weeks
    pub(crate) fn month_dates(&self, month: Date) -> Vec<Date> {
        let start = on_or_before(first_of_month(month), self.first_day.weekday());
        let end = on_or_after(last_of_month(month), self.last_day);
        iter_days_from(start).take_while(|&d| d <= end).collect()
    }

    pub(crate) fn has_holiday(&self, date: Date) -> bool {
        self.dates_by_key
            .get(&date)
            .is_some_and(|entry| entry.holiday_id.is_some())
    }

    pub(crate) fn date_week_id(&self, date: Date) -> Option<WeekId> {
        self.dates_by_key.get(&date).and_then(|entry| entry.week_id)
    }

    /// One grid per month of the year, stepping a month at a time from the
    /// year's start date
    pub(crate) fn all_months(&self) -> impl Iterator<Item = MonthView> + '_ {
        let end = self.year.date_end();
        successors(Some(self.year.date_start()), |&d| add_one_month(d))
            .take_while(move |&d| d <= end)
            .map(|d| self.month(d))
    }

    pub(crate) fn month(&self, month: Date) -> MonthView {
        let title = format!(
            "{} {:04}",
            self.lang.text(&month_key(month.month())),
            month.year()
        );
        let header = self
            .days_of_week()
            .map(|wd| self.lang.text(&weekday_short_key(wd)).into_owned());
        let grid_month = (month.year(), u8::from(month.month()));
        let year_start = self.year.date_start();
        let dates = self.month_dates(month);
        let mut week_start = dates.first().copied().unwrap_or(month);
        let days = dates
            .into_iter()
            .map(|date| {
                let on_first_day = date.weekday() == self.first_day.weekday();
                if on_first_day || date == year_start {
                    week_start = date;
                }
                let position = match (date.year(), u8::from(date.month())).cmp(&grid_month) {
                    Ordering::Less => MonthPosition::PrevMonth,
                    Ordering::Equal => MonthPosition::Current,
                    Ordering::Greater => MonthPosition::NextMonth,
                };
                DayCell {
                    date,
                    position,
                    range_start: (on_first_day && position == MonthPosition::Current)
                        || date == year_start,
                    week_start,
                    disabled: !self.year.contains(date),
                    week_id: self.date_week_id(date),
                    holiday: self.has_holiday(date),
                }
            })
            .collect();
        MonthView {
            month: first_of_month(month),
            title,
            header,
            days,
        }
    }

    /// Stylesheet colouring each week range, using the stock colour maths and
    /// template
    pub(crate) fn css(&self) -> Result<String, TemplateError> {
        self.css_with(Blend, JinjaTemplate::new(), CALENDAR_CSS)
    }

    pub(crate) fn css_with<C: ColourOps, R: TemplateRenderer>(
        &self,
        colours: C,
        renderer: R,
        template: &str,
    ) -> Result<String, TemplateError> {
        let mut css = String::new();
        for week in &self.weeks {
            css.push_str(&renderer.render(template, &week_css_vars(week, &colours))?);
            css.push('\n');
        }
        tracing::debug!(weeks = self.weeks.len(), "Generated week range CSS");
        Ok(css)
    }
}

fn week_css_vars<C: ColourOps>(week: &Week, colours: &C) -> [(&'static str, String); 6] {
    let colour = week.colour;
    let fg = contrast_foreground(colours.brightness(colour));
    [
        ("week_id", week.id.to_string()),
        ("range_bg", colours.tint(colour, 15).to_string()),
        ("range_fg", colours.shade(colour, 60).to_string()),
        ("boundary_bg", colour.to_string()),
        ("boundary_border", colours.shade(colour, 90).to_string()),
        ("boundary_fg", fg.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;
    use crate::lang::English;
    use crate::year::HolidayId;
    use time::macros::date;

    fn first_day(n: u8) -> FirstDayOfWeek {
        FirstDayOfWeek::try_from(n).unwrap()
    }

    fn entry(date: Date, week_id: Option<u32>, holiday_id: Option<u32>) -> DateEntry {
        DateEntry {
            date,
            holiday_id: holiday_id.map(HolidayId),
            week_id: week_id.map(WeekId),
        }
    }

    // 2024-09-04 is a Wednesday
    fn sample(fd: u8) -> CalendarGrid<English> {
        let year = AcademicYear::new(
            date!(2024 - 09 - 04),
            date!(2025 - 07 - 18),
            vec![
                entry(date!(2024 - 09 - 04), Some(1), None),
                entry(date!(2024 - 09 - 09), Some(2), None),
                entry(date!(2024 - 10 - 28), None, Some(5)),
            ],
        )
        .unwrap();
        let weeks = vec![
            Week {
                id: WeekId(1),
                name: String::from("Week A"),
                colour: "3b82f6".parse().unwrap(),
            },
            Week {
                id: WeekId(2),
                name: String::from("Week B"),
                colour: "fde047".parse().unwrap(),
            },
        ];
        CalendarGrid::new(year, weeks, first_day(fd), English)
    }

    fn numbers(days: [Weekday; 7]) -> Vec<u8> {
        days.iter().map(|wd| wd.number_from_monday()).collect()
    }

    #[test]
    fn test_days_of_week() {
        assert_eq!(numbers(sample(1).days_of_week()), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(numbers(sample(3).days_of_week()), [3, 4, 5, 6, 7, 1, 2]);
        assert_eq!(numbers(sample(7).days_of_week()), [7, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_month_dates_align_to_weeks() {
        for fd in 1..=7 {
            let cal = sample(fd);
            let mut month = date!(2024 - 01 - 01);
            for _ in 0..24 {
                let dates = cal.month_dates(month);
                assert_eq!(dates.len() % 7, 0, "first day {fd}, month {month}");
                assert_eq!(dates[0].weekday(), cal.first_day().weekday());
                assert_eq!(dates[dates.len() - 1].weekday(), cal.last_day);
                assert!(dates[0] <= first_of_month(month));
                assert!(dates[dates.len() - 1] >= last_of_month(month));
                assert!(dates.len() <= 42);
                month = add_one_month(month).unwrap();
            }
        }
    }

    #[test]
    fn test_month_dates_exact() {
        // September 2024 starts on a Sunday and ends on a Monday
        let dates = sample(1).month_dates(date!(2024 - 09 - 15));
        assert_eq!(dates.first(), Some(&date!(2024 - 08 - 26)));
        assert_eq!(dates.last(), Some(&date!(2024 - 10 - 06)));
        assert_eq!(dates.len(), 42);
        let dates = sample(7).month_dates(date!(2024 - 09 - 15));
        assert_eq!(dates.first(), Some(&date!(2024 - 09 - 01)));
        assert_eq!(dates.last(), Some(&date!(2024 - 10 - 05)));
        assert_eq!(dates.len(), 35);
    }

    #[test]
    fn test_month_dates_flush() {
        // February 2021 runs exactly Monday 1st to Sunday 28th
        let dates = sample(1).month_dates(date!(2021 - 02 - 10));
        assert_eq!(dates.first(), Some(&date!(2021 - 02 - 01)));
        assert_eq!(dates.last(), Some(&date!(2021 - 02 - 28)));
        assert_eq!(dates.len(), 28);
    }

    #[test]
    fn test_lookups() {
        let cal = sample(1);
        assert!(cal.has_holiday(date!(2024 - 10 - 28)));
        assert!(!cal.has_holiday(date!(2024 - 09 - 04)));
        assert!(!cal.has_holiday(date!(2030 - 01 - 01)));
        assert_eq!(cal.date_week_id(date!(2024 - 09 - 04)), Some(WeekId(1)));
        assert_eq!(cal.date_week_id(date!(2024 - 10 - 28)), None);
        assert_eq!(cal.date_week_id(date!(2030 - 01 - 01)), None);
    }

    #[test]
    fn test_duplicate_dates_later_wins() {
        let year = AcademicYear::new(
            date!(2024 - 09 - 02),
            date!(2024 - 12 - 20),
            vec![
                entry(date!(2024 - 09 - 02), Some(1), None),
                entry(date!(2024 - 09 - 02), Some(2), Some(9)),
            ],
        )
        .unwrap();
        let cal = CalendarGrid::new(year, Vec::new(), first_day(1), English);
        assert_eq!(cal.date_week_id(date!(2024 - 09 - 02)), Some(WeekId(2)));
        assert!(cal.has_holiday(date!(2024 - 09 - 02)));
    }

    #[test]
    fn test_month_title_and_header() {
        let cal = sample(3);
        let view = cal.month(date!(2024 - 09 - 04));
        assert_eq!(view.title, "September 2024");
        assert_eq!(view.month, date!(2024 - 09 - 01));
        assert_eq!(
            view.header,
            ["Wed", "Thu", "Fri", "Sat", "Sun", "Mon", "Tue"]
        );
    }

    #[test]
    fn test_year_start_mid_week() {
        let cal = sample(1);
        let view = cal.month(date!(2024 - 09 - 04));
        let find = |d: Date| {
            view.days
                .iter()
                .find(|c| c.date == d)
                .copied()
                .unwrap()
        };
        let monday = find(date!(2024 - 09 - 02));
        assert!(monday.range_start);
        assert!(monday.disabled);
        assert_eq!(monday.week_start, date!(2024 - 09 - 02));
        let start = find(date!(2024 - 09 - 04));
        assert!(start.range_start);
        assert!(!start.disabled);
        assert_eq!(start.week_start, date!(2024 - 09 - 04));
        assert_eq!(start.week_id, Some(WeekId(1)));
        let thursday = find(date!(2024 - 09 - 05));
        assert!(!thursday.range_start);
        assert_eq!(thursday.week_start, date!(2024 - 09 - 04));
        let next_monday = find(date!(2024 - 09 - 09));
        assert!(next_monday.range_start);
        assert_eq!(next_monday.week_start, date!(2024 - 09 - 09));
        assert_eq!(
            next_monday.classes(),
            ["range-start", "calendar-range", "week-2"]
        );
    }

    #[test]
    fn test_positions_across_year_end() {
        let cal = sample(1);
        let view = cal.month(date!(2024 - 12 - 01));
        let first = view.days[0];
        assert_eq!(first.date, date!(2024 - 11 - 25));
        assert_eq!(first.position, MonthPosition::PrevMonth);
        assert!(!first.range_start);
        let last = view.days[view.days.len() - 1];
        assert_eq!(last.date, date!(2025 - 01 - 05));
        assert_eq!(last.position, MonthPosition::NextMonth);
        assert_eq!(last.classes(), ["next-month"]);
        assert!(view.days.iter().all(|c| !c.disabled));
        assert!(view.contains(date!(2024 - 12 - 25)));
        assert!(!view.contains(date!(2025 - 01 - 01)));
    }

    #[test]
    fn test_holiday_flag() {
        let cal = sample(1);
        let view = cal.month(date!(2024 - 10 - 01));
        for cell in &view.days {
            assert_eq!(cell.holiday, cell.date == date!(2024 - 10 - 28));
        }
    }

    #[test]
    fn test_all_months() {
        let cal = sample(1);
        let months = cal.all_months().collect::<Vec<_>>();
        assert_eq!(months.len(), 11);
        assert_eq!(months[0].title, "September 2024");
        assert_eq!(months[4].title, "January 2025");
        assert_eq!(months[10].title, "July 2025");
        assert_eq!(cal.all_months().collect::<Vec<_>>(), months);
    }

    #[test]
    fn test_all_months_single_day() {
        let year = AcademicYear::new(date!(2025 - 03 - 10), date!(2025 - 03 - 10), Vec::new())
            .unwrap();
        let cal = CalendarGrid::new(year, Vec::new(), first_day(1), English);
        let months = cal.all_months().collect::<Vec<_>>();
        assert_eq!(months.len(), 1);
        let enabled = months[0]
            .days
            .iter()
            .filter(|c| !c.disabled)
            .map(|c| c.date)
            .collect::<Vec<_>>();
        assert_eq!(enabled, [date!(2025 - 03 - 10)]);
    }

    #[test]
    fn test_all_months_overflowing_start_day() {
        let year = AcademicYear::new(date!(2023 - 01 - 31), date!(2023 - 04 - 30), Vec::new())
            .unwrap();
        let cal = CalendarGrid::new(year, Vec::new(), first_day(1), English);
        let titles = cal.all_months().map(|m| m.title).collect::<Vec<_>>();
        assert_eq!(titles, ["January 2023", "March 2023", "April 2023"]);
    }

    #[test]
    fn test_months_at_calendar_edge() {
        let year = AcademicYear::new(date!(9999 - 10 - 15), date!(9999 - 11 - 30), Vec::new())
            .unwrap();
        for fd in 1..=7 {
            let cal = CalendarGrid::new(year.clone(), Vec::new(), first_day(fd), English);
            let months = cal.all_months().collect::<Vec<_>>();
            assert_eq!(months.len(), 2);
            let last = &months[1];
            assert_eq!(last.days.len() % 7, 0);
            assert!(last.days.iter().all(|c| c.date.year() == 9999));
        }
    }

    #[test]
    fn test_css() {
        let css = sample(1).css().unwrap();
        assert!(css.contains(".week-1 "));
        assert!(css.contains(".week-2 "));
        assert!(css.contains("background: #3b82f6;"));
        assert!(css.contains("background: #fde047;"));
        // Blue is dark enough for white text, yellow needs black
        let week2 = css.find("week-2").unwrap();
        assert!(css[..week2].contains("color: #ffffff;"));
        assert!(css[week2..].contains("color: #000000;"));
        assert!(!css.contains("{{"));
    }

    #[derive(Debug)]
    struct Flat;

    impl ColourOps for Flat {
        fn tint(&self, _colour: Colour, _percent: u8) -> Colour {
            Colour::new(1, 1, 1)
        }

        fn shade(&self, _colour: Colour, _percent: u8) -> Colour {
            Colour::new(2, 2, 2)
        }

        fn brightness(&self, _colour: Colour) -> f64 {
            130.5
        }
    }

    #[test]
    fn test_css_with_collaborators() {
        let css = sample(1).css_with(
            Flat,
            JinjaTemplate::new(),
            "{{ week_id }}:{{ range_bg }}:{{ range_fg }}:{{ boundary_bg }}:{{ boundary_border }}:{{ boundary_fg }}",
        )
        .unwrap();
        assert_eq!(
            css,
            "1:#010101:#020202:#3b82f6:#020202:#000000\n2:#010101:#020202:#fde047:#020202:#000000\n"
        );
    }

    #[test]
    fn test_css_template_error() {
        let r = sample(1).css_with(Blend, JinjaTemplate::new(), ".week-{{ week_number }} {}");
        assert!(r.is_err());
    }
}
