use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::progress::ProgressData;
use crate::engine::tier::TierThresholds;
use crate::session::result::TestResult;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::stats_sidebar::accuracy_color;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Progress summary next to the result history. `selected` counts from the
/// most recent result.
pub struct StatsPage<'a> {
    progress: &'a ProgressData,
    thresholds: &'a TierThresholds,
    history: &'a [TestResult],
    selected: usize,
    confirm_delete: bool,
    theme: &'a Theme,
}

impl<'a> StatsPage<'a> {
    pub fn new(
        progress: &'a ProgressData,
        thresholds: &'a TierThresholds,
        history: &'a [TestResult],
        selected: usize,
        confirm_delete: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            progress,
            thresholds,
            history,
            selected,
            confirm_delete,
            theme,
        }
    }
}

/// First row to draw so that `selected` stays visible in `rows` lines.
fn scroll_offset(selected: usize, rows: usize) -> usize {
    if rows == 0 {
        return selected;
    }
    selected.saturating_sub(rows - 1)
}

fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else {
        format!("{m}m {s:02}s")
    }
}

impl StatsPage<'_> {
    fn render_summary(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let value = Style::default().fg(colors.accent());
        let p = self.progress;

        let block = Block::bordered()
            .title(format!(" {} ", t!("progress.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(inner);

        let row = |name: String, text: String| {
            Line::from(vec![
                Span::styled(format!(" {name}: "), label),
                Span::styled(text, value),
            ])
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {}: ", t!("progress.tier")), label),
                Span::styled(
                    t!(p.tier.key()).to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            row(t!("progress.tests").to_string(), p.total_tests.to_string()),
            row(t!("progress.avg_cpm").to_string(), format!("{:.0}", p.average_cpm)),
            row(
                t!("progress.avg_accuracy").to_string(),
                format!("{:.1}%", p.average_accuracy),
            ),
            row(
                t!("progress.avg_consistency").to_string(),
                format!("{:.1}%", p.average_consistency),
            ),
            row(t!("progress.best_wpm").to_string(), format!("{:.0}", p.best_wpm)),
            row(t!("progress.best_cpm").to_string(), format!("{:.0}", p.best_cpm)),
            row(
                t!("progress.total_time").to_string(),
                format_duration(p.total_time_secs),
            ),
            Line::from(""),
            row(
                t!("progress.streak").to_string(),
                t!("progress.days", n = p.streak_days).to_string(),
            ),
            row(
                t!("progress.best_streak").to_string(),
                t!("progress.days", n = p.best_streak).to_string(),
            ),
        ];
        Paragraph::new(lines).render(layout[0], buf);

        if p.tier.next().is_some() {
            ProgressBar::new(
                t!("progress.next_tier"),
                p.progress_to_next(self.thresholds),
                self.theme,
            )
            .render(layout[1], buf);
        }
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("history.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.history.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", t!("history.empty")),
                Style::default().fg(colors.text_pending()),
            )))
            .render(inner, buf);
            return;
        }

        let header = Line::from(Span::styled(
            format!(
                "  {:<11}  {:<4}  {:>5}  {:>5}  {:>6}  {:>6}",
                t!("history.date"),
                t!("history.lang"),
                t!("stats.cpm"),
                t!("stats.wpm"),
                "acc",
                "time"
            ),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ));
        let mut lines = vec![header];

        let rows = inner.height.saturating_sub(1) as usize;
        let offset = scroll_offset(self.selected, rows);
        for (i, result) in self.history.iter().rev().enumerate().skip(offset).take(rows) {
            let text = format!(
                "  {:<11}  {:<4}  {:>5.0}  {:>5.0}  {:>5.1}%  {:>5.1}s",
                result.timestamp.format("%m/%d %H:%M"),
                result.language.code(),
                result.cpm,
                result.wpm,
                result.accuracy,
                result.elapsed_secs
            );
            let fg = if result.completed {
                accuracy_color(colors, result.accuracy)
            } else {
                colors.text_pending()
            };
            let style = if i == self.selected {
                Style::default().fg(fg).bg(colors.accent_dim())
            } else {
                Style::default().fg(fg)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_confirm(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dialog_area = centered_rect(40, 20, area);
        let dialog_area = Rect::new(
            dialog_area.x,
            dialog_area.y,
            dialog_area.width,
            dialog_area.height.min(5),
        );

        Clear.render(dialog_area, buf);
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", t!("history.confirm_delete")),
                Style::default().fg(colors.fg()),
            )),
        ])
        .block(
            Block::bordered()
                .border_style(Style::default().fg(colors.error()))
                .style(Style::default().bg(colors.bg())),
        )
        .render(dialog_area, buf);
    }
}

impl Widget for StatsPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[0]);

        self.render_summary(columns[0], buf);
        self.render_history(columns[1], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("history.help")),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[1], buf);

        if self.confirm_delete && !self.history.is_empty() {
            self.render_confirm(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(3, 0), 3);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(65.0), "1m 05s");
        assert_eq!(format_duration(3720.0), "1h 02m");
        assert_eq!(format_duration(-4.0), "0m 00s");
    }
}
