use crate::colour::{contrast_foreground, Colour, ColourOps};
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MENU_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);

pub(crate) const OTHER_MONTH_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::DIM);

pub(crate) const RANGE_START_MODIFIER: Modifier = Modifier::BOLD;

pub(crate) const HOLIDAY_MODIFIER: Modifier = Modifier::UNDERLINED;

pub(crate) fn rgb(colour: Colour) -> Color {
    Color::Rgb(colour.r, colour.g, colour.b)
}

/// Cell style for dates assigned to a week range of the given colour
pub(crate) fn week_style<C: ColourOps>(colours: C, colour: Colour) -> Style {
    let fg = contrast_foreground(colours.brightness(colour));
    Style::new().fg(rgb(fg)).bg(rgb(colour))
}
