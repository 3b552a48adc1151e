use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::progress::{ProgressData, TierPromotion};
use crate::engine::tier::TierThresholds;
use crate::engine::HeadlineMetric;
use crate::session::result::TestResult;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::stats_sidebar::accuracy_color;
use crate::ui::theme::Theme;

/// Result screen shown when a test ends.
pub struct Dashboard<'a> {
    result: &'a TestResult,
    progress: &'a ProgressData,
    thresholds: &'a TierThresholds,
    promotion: Option<&'a TierPromotion>,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        result: &'a TestResult,
        progress: &'a ProgressData,
        thresholds: &'a TierThresholds,
        promotion: Option<&'a TierPromotion>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            result,
            progress,
            thresholds,
            promotion,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("result.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_spans = vec![Span::styled(
            t!("result.title").to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if !self.result.completed {
            title_spans.push(Span::styled(
                format!("  {}", t!("result.partial")),
                Style::default().fg(colors.text_pending()),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_pending());
        let (headline, secondary) = match HeadlineMetric::for_language(self.result.language) {
            HeadlineMetric::Cpm => (
                format!("{:.0} {}", self.result.cpm, t!("stats.cpm")),
                format!("  ({:.0} {}, {} {:.0})", self.result.wpm, t!("stats.wpm"), t!("stats.raw"), self.result.raw_cpm),
            ),
            HeadlineMetric::Wpm => (
                format!("{:.0} {}", self.result.wpm, t!("stats.wpm")),
                format!("  ({:.0} {}, {} {:.0})", self.result.cpm, t!("stats.cpm"), t!("stats.raw"), self.result.raw_wpm),
            ),
        };

        let details = vec![
            Line::from(vec![
                Span::styled(format!("  {}: ", t!("result.speed")), label),
                Span::styled(
                    headline,
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(secondary, dim),
            ]),
            Line::from(vec![
                Span::styled(format!("  {}: ", t!("stats.accuracy")), label),
                Span::styled(
                    format!("{:.1}%", self.result.accuracy),
                    Style::default()
                        .fg(accuracy_color(colors, self.result.accuracy))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({}/{})", self.result.correct, self.result.characters),
                    dim,
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("  {}: ", t!("stats.consistency")), label),
                Span::styled(
                    format!("{:.1}%", self.result.consistency),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("  {}: ", t!("stats.time")), label),
                Span::styled(format!("{:.1}s", self.result.elapsed_secs), label),
            ]),
            Line::from(vec![
                Span::styled(format!("  {}: ", t!("stats.errors")), label),
                Span::styled(
                    self.result.errors.to_string(),
                    Style::default().fg(if self.result.errors == 0 {
                        colors.success()
                    } else {
                        colors.error()
                    }),
                ),
            ]),
        ];
        Paragraph::new(details).render(layout[1], buf);

        let tier_line = match self.promotion {
            Some(p) => Line::from(Span::styled(
                format!(
                    "  {}",
                    t!(
                        "result.promotion",
                        from = t!(p.from.key()),
                        to = t!(p.to.key())
                    )
                ),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(vec![
                Span::styled(format!("  {}: ", t!("progress.tier")), label),
                Span::styled(
                    t!(self.progress.tier.key()).to_string(),
                    Style::default().fg(colors.accent()),
                ),
            ]),
        };
        Paragraph::new(tier_line).render(layout[2], buf);

        if self.progress.tier.next().is_some() {
            ProgressBar::new(
                t!("progress.next_tier"),
                self.progress.progress_to_next(self.thresholds),
                self.theme,
            )
            .render(layout[3], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("result.help")),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[5], buf);
    }
}
