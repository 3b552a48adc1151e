use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::input::CharStatus;
use crate::session::typing::TypingSession;
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    session: &'a TypingSession,
    /// Syllable being composed by the built-in composer, drawn at the cursor.
    preedit: Option<char>,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a TypingSession, preedit: Option<char>, theme: &'a Theme) -> Self {
        Self {
            session,
            preedit,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellKind {
    Correct,
    Incorrect,
    Cursor,
    Preedit,
    Pending,
}

/// What to draw for each target position. Mistyped cells show what was typed,
/// except where the target is a space so word gaps stay visible.
fn cells(target: &[char], input: &[CharStatus], preedit: Option<char>) -> Vec<(char, CellKind)> {
    target
        .iter()
        .enumerate()
        .map(|(i, &expected)| match input.get(i) {
            Some(CharStatus::Correct) => (expected, CellKind::Correct),
            Some(CharStatus::Incorrect(actual)) if expected == ' ' || *actual == ' ' => {
                ('\u{00b7}', CellKind::Incorrect)
            }
            Some(CharStatus::Incorrect(actual)) => (*actual, CellKind::Incorrect),
            None if i == input.len() => match preedit {
                Some(p) => (p, CellKind::Preedit),
                None => (expected, CellKind::Cursor),
            },
            None => (expected, CellKind::Pending),
        })
        .collect()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let spans: Vec<Span> = cells(&self.session.target, &self.session.input, self.preedit)
            .into_iter()
            .map(|(ch, kind)| {
                let style = match kind {
                    CellKind::Correct => Style::default().fg(colors.text_correct()),
                    CellKind::Incorrect => Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                    CellKind::Cursor => Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                    CellKind::Preedit => Style::default()
                        .fg(colors.preedit())
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                    CellKind::Pending => Style::default().fg(colors.text_pending()),
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_mark_progress() {
        let target: Vec<char> = "한글 연습".chars().collect();
        let input = vec![CharStatus::Correct, CharStatus::Incorrect('굴')];
        let out = cells(&target, &input, None);
        assert_eq!(out[0], ('한', CellKind::Correct));
        assert_eq!(out[1], ('굴', CellKind::Incorrect));
        assert_eq!(out[2], (' ', CellKind::Cursor));
        assert_eq!(out[3], ('연', CellKind::Pending));
    }

    #[test]
    fn test_preedit_replaces_cursor() {
        let target: Vec<char> = "한글".chars().collect();
        let out = cells(&target, &[], Some('하'));
        assert_eq!(out[0], ('하', CellKind::Preedit));
        assert_eq!(out[1], ('글', CellKind::Pending));
    }

    #[test]
    fn test_mistyped_space_stays_visible() {
        let target: Vec<char> = "a b".chars().collect();
        let input = vec![CharStatus::Correct, CharStatus::Incorrect('x')];
        let out = cells(&target, &input, None);
        assert_eq!(out[1], ('\u{00b7}', CellKind::Incorrect));
    }
}
