use super::view::{DayCell, MonthView};
use crate::colour::ColourOps;
use crate::theme::{
    week_style, BASE_STYLE, DISABLED_STYLE, HOLIDAY_MODIFIER, OTHER_MONTH_STYLE,
    RANGE_START_MODIFIER, TITLE_STYLE, WEEKDAY_STYLE,
};
use crate::year::{Week, WeekId};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::{Modifier, Style},
    widgets::Widget,
};
use std::iter::zip;
use time::Date;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 6;

/// Width of the grid in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Offset of a day's text from the left edge of its column
const DAY_INSET: u16 = 1;

/// Number of lines taken up by the title, the weekday header and its rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the grid
const WEEK_LINES: u16 = 2;

/// Columns between consecutive entries of the week legend
const LEGEND_GAP: u16 = 2;

const ACS_HLINE: char = '─';

/// Terminal styles for each week range, in the order the ranges were given
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Palette(Vec<(WeekId, String, Style)>);

impl Palette {
    pub(crate) fn new<C: ColourOps>(weeks: &[Week], colours: C) -> Palette {
        Palette(
            weeks
                .iter()
                .map(|w| (w.id, w.name.clone(), week_style(&colours, w.colour)))
                .collect(),
        )
    }

    fn style(&self, id: WeekId) -> Option<Style> {
        self.0
            .iter()
            .find_map(|&(wid, _, style)| (wid == id).then_some(style))
    }
}

/// Draws a single [`MonthView`] in the middle of its area, followed by a
/// legend of the week ranges
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid<'a> {
    view: &'a MonthView,
    palette: &'a Palette,
    today: Option<Date>,
}

impl<'a> MonthGrid<'a> {
    pub(crate) fn new(view: &'a MonthView, palette: &'a Palette) -> Self {
        MonthGrid {
            view,
            palette,
            today: None,
        }
    }

    pub(crate) fn today(mut self, today: Option<Date>) -> Self {
        self.today = today;
        self
    }

    fn show(&self, cell: &DayCell) -> String {
        if self.today == Some(cell.date) {
            format!("[{:2}]", cell.day())
        } else {
            format!(" {:2} ", cell.day())
        }
    }

    fn cell_style(&self, cell: &DayCell) -> Style {
        let week = cell.week_id.and_then(|id| self.palette.style(id));
        let mut style = match (cell.disabled, week) {
            (true, _) => DISABLED_STYLE,
            (false, Some(ws)) => BASE_STYLE.patch(ws),
            (false, None) if cell.in_month() => BASE_STYLE,
            (false, None) => OTHER_MONTH_STYLE,
        };
        if !cell.in_month() {
            style = style.add_modifier(Modifier::DIM);
        }
        if cell.range_start {
            style = style.add_modifier(RANGE_START_MODIFIER);
        }
        if cell.holiday {
            style = style.add_modifier(HOLIDAY_MODIFIER);
        }
        style
    }
}

impl Widget for MonthGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(&self.view.title);
        canvas.draw_header(&self.view.header);
        let mut rows = 0;
        for (week_no, week) in zip(0u16.., self.view.weeks()) {
            for (col, cell) in zip(0u16.., week) {
                canvas.draw_day(week_no, col, self.show(cell), self.cell_style(cell));
            }
            rows = week_no + 1;
        }
        canvas.draw_legend(HEADER_LINES + rows * WEEK_LINES, self.palette);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        let x = MAIN_WIDTH.saturating_sub(width) / 2;
        self.mvprint(0, x, title, TITLE_STYLE);
    }

    fn draw_header(&mut self, labels: &[String]) {
        for (col, label) in zip(0u16.., labels) {
            self.mvprint(
                1,
                col * DAY_WIDTH + DAY_INSET,
                format!("{label:>3.3}"),
                WEEKDAY_STYLE,
            );
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, col: u16, s: String, style: Style) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            col * DAY_WIDTH + DAY_INSET,
            s,
            style,
        );
    }

    fn draw_legend(&mut self, y: u16, palette: &Palette) {
        let mut x = 0;
        for (_, name, style) in &palette.0 {
            if name.is_empty() {
                continue;
            }
            x = self.mvprint(y, x, format!(" {name} "), *style).saturating_add(LEGEND_GAP);
        }
    }

    // Returns the column just past the printed text
    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) -> u16 {
        if y < self.area.height && x < self.area.width {
            let (end, _) = self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(self.area.width - x),
                style,
            );
            end - self.area.x
        } else {
            x
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), BASE_STYLE);
    }
}
