use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::{Language, TextType};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub wpm: f64,
    pub raw_wpm: f64,
    pub cpm: f64,
    pub raw_cpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub elapsed_secs: f64,
    /// Characters typed against the target, right or wrong.
    pub characters: usize,
    #[serde(default)]
    pub correct: usize,
    pub errors: usize,
    #[serde(default)]
    pub keystrokes: usize,
    pub language: Language,
    pub text_type: TextType,
    /// False when the test was finished before the end of the text.
    #[serde(default = "default_true")]
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl TestResult {
    /// Speed in the unit conventional for the result's language.
    pub fn headline(&self) -> f64 {
        match self.language {
            Language::Korean => self.cpm,
            Language::English => self.wpm,
        }
    }
}
