use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

static KEYS: &[(&str, &str)] = &[
    ("j, n, DOWN", "Next month"),
    ("k, p, UP", "Previous month"),
    ("0, HOME", "First month of the year"),
    ("$, END", "Last month of the year"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEY_COLUMN: usize = 16;

const DISMISS: &str = "Press the Any Key to dismiss.";

/// Popup listing the preview's key bindings, drawn over the middle of its
/// area
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let mut lines = KEYS
            .iter()
            .map(|(keys, action)| Line::raw(format!("{keys:KEY_COLUMN$}{action}")))
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        // Content plus one column of padding and one of border on each side
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.width);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Keys ")
                    .title_alignment(Alignment::Center)
                    .padding(Padding::horizontal(1)),
            )
            .style(self.0)
            .render(popup, buf);
    }
}
