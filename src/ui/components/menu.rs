use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Words,
    Sentences,
    Stats,
    Settings,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Words,
        MenuAction::Sentences,
        MenuAction::Stats,
        MenuAction::Settings,
        MenuAction::Quit,
    ];

    pub fn hotkey(self) -> char {
        match self {
            MenuAction::Words => '1',
            MenuAction::Sentences => '2',
            MenuAction::Stats => 's',
            MenuAction::Settings => 'c',
            MenuAction::Quit => 'q',
        }
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.hotkey() == key)
    }

    fn label_key(self) -> &'static str {
        match self {
            MenuAction::Words => "menu.words",
            MenuAction::Sentences => "menu.sentences",
            MenuAction::Stats => "menu.stats",
            MenuAction::Settings => "menu.settings",
            MenuAction::Quit => "menu.quit",
        }
    }

    fn description_key(self) -> Option<&'static str> {
        match self {
            MenuAction::Words => Some("menu.words_desc"),
            MenuAction::Sentences => Some("menu.sentences_desc"),
            MenuAction::Stats => Some("menu.stats_desc"),
            MenuAction::Settings => Some("menu.settings_desc"),
            MenuAction::Quit => None,
        }
    }
}

pub struct Menu<'a> {
    selected: usize,
    tier_name: String,
    theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(selected: usize, tier_name: String, theme: &'a Theme) -> Self {
        Self {
            selected,
            tier_name,
            theme,
        }
    }
}

pub fn next_index(selected: usize) -> usize {
    (selected + 1) % MenuAction::ALL.len()
}

pub fn prev_index(selected: usize) -> usize {
    if selected > 0 {
        selected - 1
    } else {
        MenuAction::ALL.len() - 1
    }
}

impl Widget for Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.name").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.tagline").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                format!("{}: {}", t!("progress.tier"), self.tier_name),
                Style::default().fg(colors.text_pending()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                MenuAction::ALL
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, action) in MenuAction::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let mut lines = vec![Line::from(Span::styled(
                format!(" {indicator} [{}] {}", action.hotkey(), t!(action.label_key())),
                style,
            ))];
            if let Some(desc) = action.description_key() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", t!(desc)),
                    Style::default().fg(colors.text_pending()),
                )));
            }

            if i < rows.len() {
                Paragraph::new(lines).render(rows[i], buf);
            }
        }
    }
}
