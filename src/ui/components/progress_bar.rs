use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Horizontal bar with the percentage centred on it, used for test progress
/// and progress towards the next tier.
pub struct ProgressBar<'a> {
    label: String,
    ratio: f64,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: impl Into<String>, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.into(),
            ratio: if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 },
            theme,
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let text = format!("{:.0}%", self.ratio * 100.0);
        let text_x = inner.x + inner.width.saturating_sub(text.len() as u16) / 2;
        buf.set_string(text_x, inner.y, &text, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_clamped() {
        let theme = Theme::default();
        assert_eq!(ProgressBar::new("x", 1.7, &theme).ratio, 1.0);
        assert_eq!(ProgressBar::new("x", -0.2, &theme).ratio, 0.0);
        assert_eq!(ProgressBar::new("x", f64::NAN, &theme).ratio, 0.0);
    }

    #[test]
    fn test_renders_label() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("tier", 0.5, &theme).render(area, &mut buf);
        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("50%"));
    }
}
