use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{Config, InputMethod};
use crate::engine::perf::PerfMonitor;
use crate::engine::progress::{ProgressData, TierPromotion};
use crate::generator::{self, Language, LanguagePack, TextType};
use crate::hangul::composer::Composer;
use crate::session::result::TestResult;
use crate::session::typing::TypingSession;
use crate::store::json_store::JsonStore;
use crate::store::schema::HistoryData;
use crate::ui::components::menu::{self, MenuAction};
use crate::ui::components::settings::SettingField;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Test,
    Result,
    Stats,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub store: Option<JsonStore>,
    pub progress: ProgressData,
    pub history: HistoryData,
    pub session: Option<TypingSession>,
    /// In-app 2-set composition; only used when the config asks for it.
    pub composer: Composer,
    pub perf: PerfMonitor,
    pub last_result: Option<TestResult>,
    pub last_promotion: Option<TierPromotion>,
    /// Text type of the running test; a menu choice may differ from the config.
    pub text_type: TextType,
    pub menu_selected: usize,
    pub settings_selected: usize,
    pub history_selected: usize,
    pub history_confirm_delete: bool,
    /// One-line message for the footer, e.g. a pack that failed to load.
    pub notice: Option<String>,
    pub should_quit: bool,
    packs: HashMap<Language, LanguagePack>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("data dir unavailable, results will not be saved: {e}");
                None
            }
        };
        Self::with_store(config, theme, store)
    }

    pub fn with_store(config: Config, theme: Theme, store: Option<JsonStore>) -> Self {
        let (progress, history) = match &store {
            Some(s) => {
                if s.check_interrupted_import() {
                    log::warn!("cleaned up files from an interrupted import");
                }
                (s.load_progress(), s.load_history())
            }
            None => (ProgressData::default(), HistoryData::default()),
        };
        let text_type = config.text_type;

        Self {
            screen: AppScreen::Menu,
            config,
            theme,
            store,
            progress,
            history,
            session: None,
            composer: Composer::new(),
            perf: PerfMonitor::new(),
            last_result: None,
            last_promotion: None,
            text_type,
            menu_selected: 0,
            settings_selected: 0,
            history_selected: 0,
            history_confirm_delete: false,
            notice: None,
            should_quit: false,
            packs: HashMap::new(),
        }
    }

    fn pack(&mut self, language: Language) -> crate::Result<&LanguagePack> {
        if !self.packs.contains_key(&language) {
            let pack = LanguagePack::load(language)?;
            self.packs.insert(language, pack);
        }
        self.packs.get(&language).ok_or_else(|| crate::Error::InvalidPack {
            language: language.code().to_string(),
            reason: "not cached".to_string(),
        })
    }

    /// Whether keys should go through the built-in composer.
    pub fn composing_input(&self) -> bool {
        self.config.input_method == InputMethod::Dubeolsik
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.language() == Language::Korean)
    }

    pub fn start_test(&mut self, text_type: TextType, now: Instant) {
        self.text_type = text_type;
        let mut options = self.config.generate_options();
        options.text_type = text_type;
        options.length = match text_type {
            TextType::Words => self.config.word_count,
            TextType::Sentences => self.config.sentence_count,
        };

        let text = match self.pack(options.language) {
            Ok(pack) => generator::generate(pack, &options, SmallRng::from_entropy()),
            Err(e) => {
                log::error!("cannot start test: {e}");
                self.notice = Some(e.to_string());
                return;
            }
        };

        let mut session = TypingSession::with_options(
            &text,
            options.language,
            self.config.countdown(),
            self.config.stats.clone(),
        );
        session.start(now);
        self.session = Some(session);
        self.composer.clear();
        self.perf.clear();
        self.notice = None;
        self.screen = AppScreen::Test;
    }

    /// Same text again from the top. An unfinished attempt is kept as a
    /// partial result first.
    pub fn retry_test(&mut self, now: Instant) {
        self.record_partial(now);
        if let Some(session) = self.session.as_mut() {
            session.reset();
            session.start(now);
            self.composer.clear();
            self.perf.clear();
            self.screen = AppScreen::Test;
        }
    }

    pub fn type_key(&mut self, key: char, now: Instant) {
        self.tick(now);
        if !self.composing_input() {
            self.type_char(key, now);
            return;
        }

        let accepting = self
            .session
            .as_ref()
            .is_some_and(|s| s.is_active() || s.phase() == crate::session::Phase::Idle);
        if !accepting {
            return;
        }
        for ch in self.composer.feed(key) {
            self.type_char(ch, now);
        }

        let expected = self.session.as_ref().and_then(|s| s.expected());
        if expected.is_some() && self.composer.preedit() == expected {
            if let Some(ch) = self.composer.flush() {
                self.type_char(ch, now);
            }
        }
    }

    fn type_char(&mut self, ch: char, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.type_char(ch, now, &mut self.perf);
        if session.is_completed() {
            self.finish_test();
        }
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.composing_input() && self.composer.is_composing() {
            self.composer.backspace();
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.backspace(now, &mut self.perf);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.tick(now, &mut self.perf);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.pause(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.resume(now);
        }
    }

    /// Leave the running test. Anything already typed is kept as a partial
    /// result; an untouched test is dropped.
    pub fn abandon_test(&mut self, now: Instant) {
        self.record_partial(now);
        self.go_to_menu();
    }

    /// Drop the running test for a fresh text, keeping what was typed.
    pub fn restart_test(&mut self, now: Instant) {
        self.record_partial(now);
        self.start_test(self.text_type, now);
    }

    fn record_partial(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.keystrokes().is_empty() || session.is_completed() {
            return;
        }
        session.complete(now, &mut self.perf);
        self.record_result();
    }

    fn finish_test(&mut self) {
        self.record_result();
        self.screen = AppScreen::Result;
    }

    fn record_result(&mut self) {
        self.composer.clear();
        let Some(result) = self
            .session
            .as_ref()
            .and_then(|s| s.result(self.text_type))
        else {
            return;
        };

        self.last_promotion = self.progress.record(&result, &self.config.tiers);
        self.history.push(result.clone(), &self.config.tiers);
        self.last_result = Some(result);
        self.save_data();
    }

    fn save_data(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_progress(&self.progress) {
                log::warn!("saving progress failed: {e}");
            }
            if let Err(e) = store.save_history(&self.history) {
                log::warn!("saving history failed: {e}");
            }
        }
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.session = None;
        self.composer.clear();
    }

    pub fn go_to_stats(&mut self) {
        self.history_selected = 0;
        self.history_confirm_delete = false;
        self.screen = AppScreen::Stats;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = menu::next_index(self.menu_selected);
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = menu::prev_index(self.menu_selected);
    }

    pub fn run_menu_action(&mut self, action: MenuAction, now: Instant) {
        match action {
            MenuAction::Words => self.start_test(TextType::Words, now),
            MenuAction::Sentences => self.start_test(TextType::Sentences, now),
            MenuAction::Stats => self.go_to_stats(),
            MenuAction::Settings => self.go_to_settings(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn history_next(&mut self) {
        if self.history_selected + 1 < self.history.results.len() {
            self.history_selected += 1;
        }
    }

    pub fn history_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// Remove the selected result and rebuild progress from what is left.
    /// The tier is recomputed too, so it can drop.
    pub fn delete_selected_result(&mut self) {
        self.history_confirm_delete = false;
        let len = self.history.results.len();
        if len == 0 {
            return;
        }
        // the list shows newest first
        let idx = len - 1 - self.history_selected.min(len - 1);
        if let Some(removed) = self.history.remove(idx) {
            log::info!("deleted result from {}", removed.timestamp);
        }

        self.progress = self.history.progress(&self.config.tiers);
        self.save_data();

        self.history_selected = self
            .history_selected
            .min(self.history.results.len().saturating_sub(1));
    }

    pub fn settings_next(&mut self) {
        self.settings_selected = (self.settings_selected + 1) % SettingField::ALL.len();
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = self
            .settings_selected
            .checked_sub(1)
            .unwrap_or(SettingField::ALL.len() - 1);
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        let step = |value: usize, by: usize, min: usize, max: usize| {
            if forward {
                (value + by).min(max)
            } else {
                value.saturating_sub(by).max(min)
            }
        };

        match SettingField::ALL[self.settings_selected] {
            SettingField::Language => self.config.language = self.config.language.next(),
            SettingField::TextType => self.config.text_type = self.config.text_type.next(),
            SettingField::WordCount => {
                self.config.word_count = step(self.config.word_count, 5, 5, 200);
            }
            SettingField::SentenceCount => {
                self.config.sentence_count = step(self.config.sentence_count, 1, 1, 20);
            }
            SettingField::Punctuation => self.config.punctuation = !self.config.punctuation,
            SettingField::Numbers => self.config.numbers = !self.config.numbers,
            SettingField::InputMethod => {
                self.config.input_method = self.config.input_method.next();
            }
            SettingField::Countdown => {
                self.config.countdown_secs =
                    step(self.config.countdown_secs as usize, 1, 0, 10) as u64;
            }
            SettingField::ShowJamo => self.config.show_jamo = !self.config.show_jamo,
            SettingField::Theme => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let next = match themes.iter().position(|t| *t == self.config.theme) {
                    Some(idx) if forward => (idx + 1) % themes.len(),
                    Some(0) => themes.len() - 1,
                    Some(idx) => idx - 1,
                    None => 0,
                };
                self.config.theme = themes[next].clone();
                self.theme = Theme::load(&self.config.theme).unwrap_or_default();
            }
            SettingField::Locale => {
                let next = Language::from_code(&self.config.locale)
                    .unwrap_or_default()
                    .next();
                self.config.locale = next.code().to_string();
                rust_i18n::set_locale(&self.config.locale);
            }
        }
    }

    /// Write the config; called when leaving the settings screen.
    pub fn save_settings(&mut self) {
        self.config.normalize();
        if let Err(e) = self.config.save() {
            log::warn!("saving config failed: {e}");
            self.notice = Some(e.to_string());
        }
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        let store = self.store.as_ref().context("no data directory")?;
        store
            .export_to(&self.config, path)
            .with_context(|| format!("exporting to {}", path.display()))
    }

    /// Replace progress and history with an export file's contents.
    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        let store = self.store.as_ref().context("no data directory")?;
        let data = JsonStore::read_export(path)
            .with_context(|| format!("reading {}", path.display()))?;
        store.import_all(&data).context("importing")?;
        self.progress = store.load_progress();
        self.history = store.load_history();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    fn make_test_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.countdown_secs = 0;
        config.word_count = 3;
        (dir, App::with_store(config, Theme::default(), Some(store)))
    }

    fn type_all(app: &mut App, start: Instant) {
        let target: Vec<char> = app.session.as_ref().unwrap().target.clone();
        for (i, ch) in target.into_iter().enumerate() {
            app.type_key(ch, start + Duration::from_millis(200 * (i as u64 + 1)));
        }
    }

    #[test]
    fn test_full_test_records_result() {
        let (_dir, mut app) = make_test_app();
        let start = Instant::now();
        app.start_test(TextType::Words, start);
        assert_eq!(app.screen, AppScreen::Test);

        type_all(&mut app, start);
        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert!(result.completed);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(app.history.results.len(), 1);
        assert_eq!(app.progress.total_tests, 1);

        let saved = app.store.as_ref().unwrap().load_history();
        assert_eq!(saved.results.len(), 1);
    }

    #[test]
    fn test_abandon_keeps_partial_result() {
        let (_dir, mut app) = make_test_app();
        let start = Instant::now();
        app.start_test(TextType::Words, start);
        let first = app.session.as_ref().unwrap().target[0];
        app.type_key(first, start + Duration::from_secs(1));
        app.abandon_test(start + Duration::from_secs(2));

        assert_eq!(app.screen, AppScreen::Menu);
        assert_eq!(app.history.results.len(), 1);
        assert!(!app.history.results[0].completed);
        assert_eq!(app.progress.total_tests, 0);
    }

    #[test]
    fn test_abandon_untouched_test_records_nothing() {
        let (_dir, mut app) = make_test_app();
        let start = Instant::now();
        app.start_test(TextType::Sentences, start);
        app.abandon_test(start + Duration::from_secs(1));
        assert!(app.history.results.is_empty());
    }

    #[test]
    fn test_composer_types_korean_from_latin_keys() {
        let (_dir, mut app) = make_test_app();
        app.config.input_method = InputMethod::Dubeolsik;
        app.session = Some(TypingSession::new("한글", Language::Korean, Duration::ZERO));
        app.screen = AppScreen::Test;

        let start = Instant::now();
        for (i, key) in "gksrmf".chars().enumerate() {
            app.type_key(key, start + Duration::from_millis(100 * (i as u64 + 1)));
        }
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.last_result.as_ref().unwrap().accuracy, 100.0);
    }

    #[test]
    fn test_composer_backspace_edits_preedit_first() {
        let (_dir, mut app) = make_test_app();
        app.config.input_method = InputMethod::Dubeolsik;
        app.session = Some(TypingSession::new("한글", Language::Korean, Duration::ZERO));
        let now = Instant::now();

        app.type_key('g', now);
        app.type_key('k', now + Duration::from_millis(100));
        assert_eq!(app.composer.preedit(), Some('하'));
        app.backspace(now + Duration::from_millis(200));
        assert_eq!(app.composer.preedit(), Some('ㅎ'));
        app.backspace(now + Duration::from_millis(300));
        assert!(!app.composer.is_composing());
        assert_eq!(app.session.as_ref().unwrap().current_index(), 0);
    }

    #[test]
    fn test_restart_keeps_partial_result() {
        let (_dir, mut app) = make_test_app();
        let start = Instant::now();
        app.start_test(TextType::Words, start);
        let first = app.session.as_ref().unwrap().target[0];
        app.type_key(first, start + Duration::from_secs(1));

        app.restart_test(start + Duration::from_secs(2));
        assert_eq!(app.screen, AppScreen::Test);
        assert_eq!(app.history.results.len(), 1);
        assert!(!app.history.results[0].completed);
        assert!(app.session.as_ref().unwrap().keystrokes().is_empty());

        // nothing typed in the new text, so nothing more is kept
        app.restart_test(start + Duration::from_secs(3));
        assert_eq!(app.history.results.len(), 1);
    }

    #[test]
    fn test_delete_result_rebuilds_progress() {
        let (_dir, mut app) = make_test_app();
        let start = Instant::now();
        for round in 0..2u64 {
            let begin = start + Duration::from_secs(round * 60);
            app.start_test(TextType::Words, begin);
            type_all(&mut app, begin);
        }
        assert_eq!(app.progress.total_tests, 2);

        app.go_to_stats();
        app.delete_selected_result();
        assert_eq!(app.history.results.len(), 1);
        assert_eq!(app.progress.total_tests, 1);
        assert_eq!(app.history_selected, 0);
    }

    fn completed_result(at: chrono::DateTime<chrono::Utc>, step_ms: u64) -> TestResult {
        let mut perf = PerfMonitor::new();
        let t0 = Instant::now();
        let mut session = TypingSession::new("가나다", Language::Korean, Duration::ZERO);
        session.start(t0);
        for (i, ch) in "가나다".chars().enumerate() {
            session.type_char(ch, t0 + Duration::from_millis(step_ms * (i as u64 + 1)), &mut perf);
        }
        let mut result = session.result(TextType::Words).unwrap();
        result.timestamp = at;
        result
    }

    #[test]
    fn test_delete_past_history_cap_keeps_older_progress() {
        use crate::store::schema::HISTORY_LIMIT;

        let mut app = App::with_store(Config::default(), Theme::default(), None);
        let t0 = chrono::Utc::now() - chrono::Duration::days(1);
        let total = HISTORY_LIMIT + 100;
        for i in 0..total {
            // the oldest results are the fastest, so they hold the best score
            let step = if i < 10 { 100 } else { 300 };
            let result = completed_result(t0 + chrono::Duration::seconds(i as i64), step);
            app.progress.record(&result, &app.config.tiers);
            app.history.push(result, &app.config.tiers);
        }
        let before = app.progress.clone();
        assert_eq!(before.total_tests, total as u32);
        assert_eq!(app.history.results.len(), HISTORY_LIMIT);
        assert_eq!(app.history.progress(&app.config.tiers), before);

        app.go_to_stats();
        app.delete_selected_result();

        assert_eq!(app.progress.total_tests, before.total_tests - 1);
        assert_eq!(app.progress.best_cpm, before.best_cpm);
        assert_eq!(app.progress.tier, before.tier);
        assert_eq!(app.progress.streak_days, before.streak_days);
        assert!(app.progress.total_time_secs < before.total_time_secs);
        assert!(app.progress.total_time_secs > before.total_time_secs - 2.0);
    }

    #[test]
    fn test_settings_cycle_clamps_counts() {
        let (_dir, mut app) = make_test_app();
        app.settings_selected = SettingField::ALL
            .iter()
            .position(|f| *f == SettingField::WordCount)
            .unwrap();
        app.config.word_count = 5;
        app.settings_cycle(false);
        assert_eq!(app.config.word_count, 5);
        app.settings_cycle(true);
        assert_eq!(app.config.word_count, 10);
    }

    #[test]
    fn test_export_import_through_app() {
        let (dir, mut app) = make_test_app();
        let start = Instant::now();
        app.start_test(TextType::Words, start);
        type_all(&mut app, start);

        let path = dir.path().join("export.json");
        app.export_to(&path).unwrap();

        let (_dir2, mut other) = make_test_app();
        other.import_from(&path).unwrap();
        assert_eq!(other.history.results.len(), 1);
        assert_eq!(other.progress.total_tests, 1);
    }
}
