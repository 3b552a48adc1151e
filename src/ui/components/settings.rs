use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::config::{Config, InputMethod};
use crate::generator::{Language, TextType};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingField {
    Language,
    TextType,
    WordCount,
    SentenceCount,
    Punctuation,
    Numbers,
    InputMethod,
    Countdown,
    ShowJamo,
    Theme,
    Locale,
}

impl SettingField {
    pub const ALL: [SettingField; 11] = [
        SettingField::Language,
        SettingField::TextType,
        SettingField::WordCount,
        SettingField::SentenceCount,
        SettingField::Punctuation,
        SettingField::Numbers,
        SettingField::InputMethod,
        SettingField::Countdown,
        SettingField::ShowJamo,
        SettingField::Theme,
        SettingField::Locale,
    ];

    fn label_key(self) -> &'static str {
        match self {
            SettingField::Language => "settings.language",
            SettingField::TextType => "settings.text_type",
            SettingField::WordCount => "settings.word_count",
            SettingField::SentenceCount => "settings.sentence_count",
            SettingField::Punctuation => "settings.punctuation",
            SettingField::Numbers => "settings.numbers",
            SettingField::InputMethod => "settings.input_method",
            SettingField::Countdown => "settings.countdown",
            SettingField::ShowJamo => "settings.show_jamo",
            SettingField::Theme => "settings.theme",
            SettingField::Locale => "settings.locale",
        }
    }

    pub fn display(self, config: &Config) -> String {
        let toggle = |on: bool| {
            if on {
                t!("settings.enabled").to_string()
            } else {
                t!("settings.disabled").to_string()
            }
        };
        match self {
            SettingField::Language => language_name(config.language),
            SettingField::TextType => match config.text_type {
                TextType::Words => t!("value.words").to_string(),
                TextType::Sentences => t!("value.sentences").to_string(),
            },
            SettingField::WordCount => config.word_count.to_string(),
            SettingField::SentenceCount => config.sentence_count.to_string(),
            SettingField::Punctuation => toggle(config.punctuation),
            SettingField::Numbers => toggle(config.numbers),
            SettingField::InputMethod => match config.input_method {
                InputMethod::System => t!("value.system").to_string(),
                InputMethod::Dubeolsik => t!("value.dubeolsik").to_string(),
            },
            SettingField::Countdown => config.countdown_secs.to_string(),
            SettingField::ShowJamo => toggle(config.show_jamo),
            SettingField::Theme => config.theme.clone(),
            SettingField::Locale => Language::from_code(&config.locale)
                .map(language_name)
                .unwrap_or_else(|| config.locale.clone()),
        }
    }
}

pub fn language_name(language: Language) -> String {
    match language {
        Language::Korean => t!("value.ko").to_string(),
        Language::English => t!("value.en").to_string(),
    }
}

pub struct SettingsPanel<'a> {
    config: &'a Config,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(config: &'a Config, selected: usize, theme: &'a Theme) -> Self {
        Self {
            config,
            selected,
            theme,
        }
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("settings.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let label_width = SettingField::ALL
            .iter()
            .map(|f| t!(f.label_key()).chars().count())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = SettingField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { " > " } else { "   " };
                let label_style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let value_style = Style::default().fg(if is_selected {
                    colors.preedit()
                } else {
                    colors.text_pending()
                });
                let label = t!(field.label_key()).to_string();
                let pad = label_width.saturating_sub(label.chars().count());
                Line::from(vec![
                    Span::styled(format!("{indicator}{label}{}", " ".repeat(pad)), label_style),
                    Span::styled(format!("  < {} >", field.display(self.config)), value_style),
                ])
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("settings.help")),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[2], buf);
    }
}
