use crate::calendar::{MonthGrid, MonthView, Palette};
use crate::help::Help;
use crate::menu::MenuEntry;
use crate::theme::{BASE_STYLE, MENU_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
    Terminal,
};
use std::io::{self, Write};
use time::Date;

/// Blank lines between the menu bar and the month grid
const MENU_GAP: u16 = 1;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    months: Vec<MonthView>,
    current: usize,
    palette: Palette,
    menu_bar: MenuBar,
    today: Option<Date>,
    state: AppState,
}

impl App {
    /// Opens on the month containing `today` if the year has one, otherwise
    /// on the first month
    pub(crate) fn new(months: Vec<MonthView>, palette: Palette, today: Option<Date>) -> App {
        let current = today
            .and_then(|d| months.iter().position(|m| m.contains(d)))
            .unwrap_or(0);
        App {
            months,
            current,
            palette,
            menu_bar: MenuBar::default(),
            today,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn menus(mut self, main_menu: &[MenuEntry], user_menu: &[MenuEntry]) -> App {
        self.menu_bar = MenuBar::new(main_menu, user_menu);
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize and anything else
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('j' | 'n') | KeyCode::Down => self.next_month(),
                KeyCode::Char('k' | 'p') | KeyCode::Up => self.prev_month(),
                KeyCode::Char('0') | KeyCode::Home => self.first_month(),
                KeyCode::Char('$') | KeyCode::End => self.last_month(),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn next_month(&mut self) -> bool {
        if self.current + 1 < self.months.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn prev_month(&mut self) -> bool {
        if let Some(i) = self.current.checked_sub(1) {
            self.current = i;
            true
        } else {
            false
        }
    }

    fn first_month(&mut self) -> bool {
        self.current = 0;
        true
    }

    fn last_month(&mut self) -> bool {
        self.current = self.months.len().saturating_sub(1);
        true
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let top = (1 + MENU_GAP).min(area.height);
        let menu_area = Rect {
            height: area.height.min(1),
            ..area
        };
        let grid_area = Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        };
        self.menu_bar.render(menu_area, buf);
        if let Some(view) = self.months.get(self.current) {
            MonthGrid::new(view, &self.palette)
                .today(self.today)
                .render(grid_area, buf);
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

/// The top line of the preview: visible main menu labels on the left, visible
/// user menu labels on the right
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct MenuBar {
    left: String,
    right: String,
}

impl MenuBar {
    fn new(main_menu: &[MenuEntry], user_menu: &[MenuEntry]) -> MenuBar {
        MenuBar {
            left: labels(main_menu),
            right: labels(user_menu),
        }
    }
}

fn labels(entries: &[MenuEntry]) -> String {
    entries
        .iter()
        .filter(|e| e.visible)
        .map(|e| format!(" {} ", e.label))
        .collect::<Vec<_>>()
        .join("|")
}

impl Widget for &MenuBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, MENU_STYLE);
        let width = usize::from(area.width);
        buf.set_stringn(area.x, area.y, &self.left, width, MENU_STYLE);
        let right_width = u16::try_from(self.right.chars().count()).unwrap_or(u16::MAX);
        if right_width > 0 && right_width <= area.width {
            let x = area.x + area.width - right_width;
            buf.set_stringn(x, area.y, &self.right, width, MENU_STYLE);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarGrid;
    use crate::config::FirstDayOfWeek;
    use crate::lang::English;
    use crate::menu::Menus;
    use crate::year::AcademicYear;
    use ratatui::style::Color;
    use time::macros::date;

    fn months() -> Vec<MonthView> {
        let year = AcademicYear::new(date!(2024 - 09 - 04), date!(2025 - 07 - 18), Vec::new())
            .unwrap();
        CalendarGrid::new(year, Vec::new(), FirstDayOfWeek::MONDAY, English)
            .all_months()
            .collect()
    }

    fn title(app: &App) -> &str {
        &app.months[app.current].title
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_opens_on_today() {
        let app = App::new(months(), Palette::default(), Some(date!(2025 - 02 - 14)));
        assert_eq!(title(&app), "February 2025");
        let app = App::new(months(), Palette::default(), Some(date!(2026 - 02 - 14)));
        assert_eq!(title(&app), "September 2024");
        let app = App::new(months(), Palette::default(), None);
        assert_eq!(title(&app), "September 2024");
    }

    #[test]
    fn test_navigation() {
        let mut app = App::new(months(), Palette::default(), None);
        assert!(!app.handle_key(KeyCode::Char('k')));
        assert_eq!(title(&app), "September 2024");
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(title(&app), "December 2024");
        assert!(app.handle_key(KeyCode::Up));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(title(&app), "October 2024");
        assert!(app.handle_key(KeyCode::End));
        assert_eq!(title(&app), "July 2025");
        assert!(!app.handle_key(KeyCode::Char('j')));
        assert_eq!(title(&app), "July 2025");
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(title(&app), "September 2024");
        assert!(!app.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = App::new(months(), Palette::default(), None);
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(title(&app), "September 2024");
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
        assert!(!app.handle_key(KeyCode::Char('j')));
    }

    #[test]
    fn test_empty_year_list() {
        let mut app = App::new(Vec::new(), Palette::default(), None);
        assert!(!app.handle_key(KeyCode::Char('j')));
        assert!(!app.handle_key(KeyCode::Char('k')));
        assert!(app.handle_key(KeyCode::End));
        assert_eq!(app.current, 0);
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        assert_eq!(row(&buf, 2), " ".repeat(20));
    }

    #[test]
    fn test_render_with_menus() {
        let menus = Menus::new(true);
        let app = App::new(months(), Palette::default(), Some(date!(2024 - 09 - 10)))
            .menus(&menus.main_menu(), &menus.user_menu(English));
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        assert_eq!(
            row(&buf, 0),
            format!(
                "{}{:>27}",
                " Dashboard | Bookings | Settings ", " Account | Log out "
            )
        );
        assert_eq!(buf[(0, 0)].bg, Color::Gray);
        assert_eq!(row(&buf, 1), " ".repeat(60));
        assert_eq!(row(&buf, 2), format!("{:^60}", "September 2024"));
        assert_eq!(
            row(&buf, 9),
            format!(
                "{:9}{}{:9}",
                "", "   9   [10]   11    12    13    14    15  ", ""
            )
        );
    }

    #[test]
    fn test_render_logged_out_menu_is_blank() {
        let menus = Menus::new(false);
        let app = App::new(months(), Palette::default(), None)
            .menus(&menus.main_menu(), &menus.user_menu(English));
        let area = Rect::new(0, 0, 42, 4);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        assert_eq!(row(&buf, 0), " ".repeat(42));
        assert_eq!(buf[(0, 0)].bg, Color::Gray);
    }
}
