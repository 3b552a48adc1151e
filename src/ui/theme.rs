use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Declares `ThemeColors` with one string field per role, a `Color`
/// accessor of the same name and the built-in fallback value.
macro_rules! theme_colors {
    ($($(#[$doc:meta])* $role:ident = $fallback:literal,)+) => {
        #[derive(Clone, Debug, Serialize, Deserialize)]
        pub struct ThemeColors {
            $($(#[$doc])* pub $role: String,)+
        }

        impl Default for ThemeColors {
            fn default() -> Self {
                Self {
                    $($role: $fallback.to_string(),)+
                }
            }
        }

        impl ThemeColors {
            $(pub fn $role(&self) -> Color {
                parse_color(&self.$role)
            })+
        }
    };
}

theme_colors! {
    bg = "reset",
    fg = "reset",
    text_correct = "#5faf5f",
    text_incorrect = "#d75f5f",
    text_incorrect_bg = "#3a1f1f",
    text_pending = "#808080",
    text_cursor_bg = "#d0d0d0",
    text_cursor_fg = "#1c1c1c",
    /// Syllable still being composed at the cursor.
    preedit = "#d7af5f",
    accent = "#5f87d7",
    accent_dim = "#3a3a3a",
    border = "#585858",
    header_bg = "#303030",
    header_fg = "#d0d0d0",
    bar_filled = "#5f87d7",
    bar_empty = "#303030",
    error = "#d75f5f",
    warning = "#d7af5f",
    success = "#5faf5f",
}

/// `#rrggbb`, or `reset` for the terminal's own color. Anything else is white.
pub fn parse_color(value: &str) -> Color {
    if value.eq_ignore_ascii_case("reset") {
        return Color::Reset;
    }
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Color::White;
    }
    u32::from_str_radix(hex, 16).map_or(Color::White, Color::from_u32)
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        let user_theme_path = Config::config_dir()
            .join("themes")
            .join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => log::warn!("{}: {e}", user_theme_path.display()),
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("terminal-default").unwrap_or_else(|| Self {
            name: "terminal-default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}
