use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::{HeadlineMetric, LiveStats};
use crate::ui::theme::{Theme, ThemeColors};

/// Live numbers for the test in progress.
pub struct StatsSidebar<'a> {
    stats: &'a LiveStats,
    headline: HeadlineMetric,
    progress: f64,
    recompute_avg: Option<Duration>,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(
        stats: &'a LiveStats,
        headline: HeadlineMetric,
        progress: f64,
        recompute_avg: Option<Duration>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            stats,
            headline,
            progress,
            recompute_avg,
            theme,
        }
    }
}

pub fn accuracy_color(colors: &ThemeColors, accuracy: f64) -> Color {
    if accuracy >= 95.0 {
        colors.success()
    } else if accuracy >= 85.0 {
        colors.warning()
    } else {
        colors.error()
    }
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_pending());

        let (headline_label, raw_value, secondary_label, secondary_value) = match self.headline {
            HeadlineMetric::Cpm => (t!("stats.cpm"), self.stats.raw_cpm, t!("stats.wpm"), self.stats.wpm),
            HeadlineMetric::Wpm => (t!("stats.wpm"), self.stats.raw_wpm, t!("stats.cpm"), self.stats.cpm),
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{headline_label}: "), label),
                Span::styled(
                    format!("{:.0}", self.headline.value(self.stats)),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  ({} {raw_value:.0})", t!("stats.raw")), dim),
            ]),
            Line::from(vec![
                Span::styled(format!("{secondary_label}: "), label),
                Span::styled(format!("{secondary_value:.0}"), dim),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.accuracy")), label),
                Span::styled(
                    format!("{:.1}%", self.stats.accuracy),
                    Style::default().fg(accuracy_color(colors, self.stats.accuracy)),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.consistency")), label),
                Span::styled(
                    format!("{:.1}%", self.stats.consistency),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.progress")), label),
                Span::styled(
                    format!("{:.0}%", self.progress * 100.0),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.errors")), label),
                Span::styled(
                    self.stats.errors_count.to_string(),
                    Style::default().fg(colors.error()),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.time")), label),
                Span::styled(format!("{:.1}s", self.stats.time_elapsed), label),
            ]),
        ];

        if let Some(avg) = self.recompute_avg {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{}: {}\u{00b5}s", t!("stats.recompute"), avg.as_micros()),
                dim,
            )));
        }

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.live")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
