use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::hangul::SlidingWindow;
use crate::ui::theme::Theme;

/// The jamo around the cursor, one cell per jamo. Cells before the cursor
/// are done, the cursor cell is the next key to press.
pub struct JamoStrip<'a> {
    window: &'a SlidingWindow,
    theme: &'a Theme,
}

impl<'a> JamoStrip<'a> {
    pub fn new(window: &'a SlidingWindow, theme: &'a Theme) -> Self {
        Self { window, theme }
    }
}

impl Widget for JamoStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut spans = Vec::with_capacity(self.window.cells.len() * 2);
        for (i, cell) in self.window.cells.iter().enumerate() {
            let style = if i < self.window.cursor_offset {
                Style::default().fg(colors.text_correct())
            } else if i == self.window.cursor_offset {
                Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_pending())
            };
            let glyph = cell.map(String::from).unwrap_or_else(|| " ".to_string());
            spans.push(Span::styled(format!(" {glyph} "), style));
        }

        let block = Block::bordered()
            .title(format!(" {} ", t!("test.jamo")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
