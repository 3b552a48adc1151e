use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::engine::live_stats::StatsOptions;
use crate::engine::tier::TierThresholds;
use crate::error::Result;
use crate::generator::{GenerateOptions, Language, TextType};
use crate::hangul::visualize::DEFAULT_WINDOW_SIZE;

/// How Korean text reaches the test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// The terminal delivers composed syllables from the OS input method.
    #[default]
    System,
    /// Latin keys are composed in-app on the 2-set layout.
    Dubeolsik,
}

impl InputMethod {
    pub fn next(self) -> Self {
        match self {
            InputMethod::System => InputMethod::Dubeolsik,
            InputMethod::Dubeolsik => InputMethod::System,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub text_type: TextType,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_sentence_count")]
    pub sentence_count: usize,
    #[serde(default)]
    pub punctuation: bool,
    #[serde(default)]
    pub numbers: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub input_method: InputMethod,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
    #[serde(default = "default_show_jamo")]
    pub show_jamo: bool,
    #[serde(default = "default_jamo_window")]
    pub jamo_window: usize,
    #[serde(default)]
    pub stats: StatsOptions,
    #[serde(default)]
    pub tiers: TierThresholds,
}

fn default_word_count() -> usize {
    25
}
fn default_sentence_count() -> usize {
    3
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_locale() -> String {
    "ko".to_string()
}
fn default_countdown_secs() -> u64 {
    3
}
fn default_show_jamo() -> bool {
    true
}
fn default_jamo_window() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            text_type: TextType::default(),
            word_count: default_word_count(),
            sentence_count: default_sentence_count(),
            punctuation: false,
            numbers: false,
            theme: default_theme(),
            locale: default_locale(),
            input_method: InputMethod::default(),
            countdown_secs: default_countdown_secs(),
            show_jamo: default_show_jamo(),
            jamo_window: default_jamo_window(),
            stats: StatsOptions::default(),
            tiers: TierThresholds::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Like `load`, but a broken file is logged and replaced by defaults.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("config unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taja")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp values a hand-edited file could push out of range.
    pub fn normalize(&mut self) {
        self.word_count = self.word_count.clamp(1, 500);
        self.sentence_count = self.sentence_count.clamp(1, 50);
        self.countdown_secs = self.countdown_secs.min(10);
        self.jamo_window = self.jamo_window.clamp(1, 15);
        if !matches!(self.locale.as_str(), "ko" | "en") {
            self.locale = default_locale();
        }
    }

    pub fn length(&self) -> usize {
        match self.text_type {
            TextType::Words => self.word_count,
            TextType::Sentences => self.sentence_count,
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            language: self.language,
            text_type: self.text_type,
            length: self.length(),
            punctuation: self.punctuation,
            numbers: self.numbers,
        }
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }
}
