use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use rust_i18n::t;

use taja::app::{App, AppScreen};
use taja::config::{Config, InputMethod};
use taja::engine::HeadlineMetric;
use taja::event::{AppEvent, EventHandler, TICK_RATE};
use taja::generator::{Language, TextType};
use taja::hangul::sliding_visualization;
use taja::logging;
use taja::session::Phase;
use taja::ui;
use taja::ui::components::dashboard::Dashboard;
use taja::ui::components::jamo_strip::JamoStrip;
use taja::ui::components::menu::{Menu, MenuAction};
use taja::ui::components::progress_bar::ProgressBar;
use taja::ui::components::settings::{SettingsPanel, language_name};
use taja::ui::components::stats_page::StatsPage;
use taja::ui::components::stats_sidebar::StatsSidebar;
use taja::ui::components::typing_area::TypingArea;
use taja::ui::layout::{TestLayout, pack_hint_lines};
use taja::ui::theme::Theme;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "taja", version, about = "Korean and English typing practice")]
struct Cli {
    #[arg(long, value_enum, help = "Practice language")]
    lang: Option<Language>,

    #[arg(long, value_enum, help = "Words or sentences")]
    mode: Option<TextType>,

    #[arg(long, help = "Number of words or sentences per test")]
    length: Option<usize>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_enum, help = "How Korean is typed")]
    ime: Option<InputMethod>,

    #[arg(long, help = "Interface language (ko, en)")]
    locale: Option<String>,

    #[arg(long, value_name = "PATH", help = "Write progress and history to a file and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Replace progress and history from an export file and exit")]
    import: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(lang) = self.lang {
            config.language = lang;
        }
        if let Some(mode) = self.mode {
            config.text_type = mode;
        }
        if let Some(length) = self.length {
            match config.text_type {
                TextType::Words => config.word_count = length,
                TextType::Sentences => config.sentence_count = length,
            }
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(ime) = self.ime {
            config.input_method = ime;
        }
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }
        config.normalize();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&logging::log_path()) {
        eprintln!("logging disabled: {e}");
    }

    let mut config = Config::load_or_default();
    cli.apply(&mut config);
    rust_i18n::set_locale(&config.locale);
    log::info!("starting taja {}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(config);

    if let Some(path) = &cli.export {
        app.export_to(path)?;
        println!("exported to {}", path.display());
        return Ok(());
    }
    if let Some(path) = &cli.import {
        app.import_from(path)?;
        println!(
            "imported {} results from {}",
            app.history.results.len(),
            path.display()
        );
        return Ok(());
    }

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    log::info!("exiting");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if app.screen == AppScreen::Test {
            app.abandon_test(now);
        }
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key, now),
        AppScreen::Test => handle_test_key(app, key, now),
        AppScreen::Result => handle_result_key(app, key, now),
        AppScreen::Stats => handle_stats_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.run_menu_action(MenuAction::ALL[app.menu_selected], now),
        KeyCode::Char(ch) => {
            if let Some(action) = MenuAction::from_hotkey(ch) {
                app.run_menu_action(action, now);
            }
        }
        _ => {}
    }
}

fn handle_test_key(app: &mut App, key: KeyEvent, now: Instant) {
    let phase = app.session.as_ref().map(|s| s.phase());

    if let Some(Phase::Paused { .. }) = phase {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.resume(now),
            KeyCode::Char('r') => app.retry_test(now),
            KeyCode::Char('q') | KeyCode::Esc => app.abandon_test(now),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => match phase {
            Some(Phase::Active) => app.pause(now),
            _ => app.abandon_test(now),
        },
        KeyCode::Tab => app.restart_test(now),
        KeyCode::Backspace => app.backspace(now),
        KeyCode::Char(ch) => app.type_key(ch, now),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.start_test(app.text_type, now),
        KeyCode::Char('r') => app.retry_test(now),
        KeyCode::Char('s') => app.go_to_stats(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    if app.history_confirm_delete {
        match key.code {
            KeyCode::Char('y') => app.delete_selected_result(),
            KeyCode::Char('n') | KeyCode::Esc => app.history_confirm_delete = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.history_next(),
        KeyCode::Up | KeyCode::Char('k') => app.history_prev(),
        KeyCode::Char('x') | KeyCode::Delete => {
            if !app.history.results.is_empty() {
                app.history_confirm_delete = true;
            }
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.save_settings();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Test => render_test(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::Stats => render_stats(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header_line<'a>(title: String, info: String, theme: &Theme) -> Paragraph<'a> {
    let colors = &theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, hints: &[&str], area: Rect) {
    let colors = &app.theme.colors;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            format!("  {notice}"),
            Style::default().fg(colors.error()),
        )));
    }
    lines.extend(
        pack_hint_lines(hints, area.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending())))),
    );
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(area);

    let streak = if app.progress.streak_days > 0 {
        format!(
            " | {}: {}",
            t!("progress.streak"),
            t!("progress.days", n = app.progress.streak_days)
        )
    } else {
        String::new()
    };
    let info = format!(
        " {} | {}: {}{streak}",
        language_name(app.config.language),
        t!("progress.tests"),
        app.progress.total_tests
    );
    frame.render_widget(
        header_line(t!("app.name").to_string(), info, &app.theme),
        header,
    );

    let menu_area = ui::layout::centered_rect(50, 80, body);
    let menu = Menu::new(
        app.menu_selected,
        t!(app.progress.tier.key()).to_string(),
        &app.theme,
    );
    frame.render_widget(menu, menu_area);

    let help = t!("menu.help");
    render_footer(frame, app, &[&*help], footer);
}

fn render_test(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;
    let now = Instant::now();
    let want_jamo = app.config.show_jamo && session.language() == Language::Korean;
    let layout = TestLayout::new(area, want_jamo);

    let (headline, value) = session.stats_engine().headline();
    let title = format!(
        "{} · {}",
        language_name(session.language()),
        match app.text_type {
            TextType::Words => t!("value.words"),
            TextType::Sentences => t!("value.sentences"),
        }
    );
    let info = if layout.tier.show_sidebar() {
        String::new()
    } else {
        let stats = session.stats();
        format!(
            " {}: {value:.0} | {}: {:.1}% | {}: {}",
            headline_label(headline),
            t!("stats.accuracy"),
            stats.accuracy,
            t!("stats.errors"),
            stats.errors_count
        )
    };
    frame.render_widget(header_line(title, info, &app.theme), layout.header);

    let preedit = if app.composing_input() {
        app.composer.preedit()
    } else {
        None
    };
    frame.render_widget(TypingArea::new(session, preedit, &app.theme), layout.typing);
    frame.render_widget(
        ProgressBar::new(t!("stats.progress"), session.progress(), &app.theme),
        layout.progress,
    );

    if let Some(jamo_area) = layout.jamo {
        let text: String = session.target.iter().collect();
        let window = sliding_visualization(&text, session.current_index(), app.config.jamo_window);
        frame.render_widget(JamoStrip::new(&window, &app.theme), jamo_area);
    }

    if let Some(sidebar_area) = layout.sidebar {
        let sidebar = StatsSidebar::new(
            session.stats(),
            headline,
            session.progress(),
            app.perf.average(),
            &app.theme,
        );
        frame.render_widget(sidebar, sidebar_area);
    }

    let help = t!("test.help");
    render_footer(frame, app, &[&*help], layout.footer);

    let overlay = match session.phase() {
        Phase::Countdown { .. } => {
            let secs = session
                .countdown_remaining(now)
                .map(|d| d.as_secs_f64().ceil() as u64)
                .unwrap_or(0);
            Some((t!("test.countdown", secs = secs).to_string(), None))
        }
        Phase::Paused { .. } => Some((
            t!("test.paused").to_string(),
            Some(t!("test.paused_help").to_string()),
        )),
        _ => None,
    };
    if let Some((title, detail)) = overlay {
        let width = (area.width / 2).max(30).min(area.width);
        let height = 5.min(area.height);
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        let mut lines = vec![Line::from(Span::styled(
            title,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(detail) = detail {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                detail,
                Style::default().fg(colors.text_pending()),
            )));
        }
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.accent()))
                    .style(Style::default().bg(colors.bg())),
            ),
            popup,
        );
    }
}

fn headline_label(metric: HeadlineMetric) -> String {
    match metric {
        HeadlineMetric::Cpm => t!("stats.cpm").to_string(),
        HeadlineMetric::Wpm => t!("stats.wpm").to_string(),
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(result) = &app.last_result {
        let centered = ui::layout::centered_rect(60, 70, area);
        let dashboard = Dashboard::new(
            result,
            &app.progress,
            &app.config.tiers,
            app.last_promotion.as_ref(),
            &app.theme,
        );
        frame.render_widget(dashboard, centered);
    }
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let page = StatsPage::new(
        &app.progress,
        &app.config.tiers,
        &app.history.results,
        app.history_selected,
        app.history_confirm_delete,
        &app.theme,
    );
    frame.render_widget(page, frame.area());
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let centered = ui::layout::centered_rect(60, 80, area);
    frame.render_widget(
        SettingsPanel::new(&app.config, app.settings_selected, &app.theme),
        centered,
    );
}
