pub mod numbers;
pub mod pack;
pub mod punctuate;
pub mod sentences;
pub mod words;

use clap::ValueEnum;
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

pub use pack::LanguagePack;
pub use sentences::SentenceGenerator;
pub use words::WordGenerator;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "ko")]
    #[value(name = "ko")]
    Korean,
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Korean, Language::English];

    pub fn code(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    pub fn next(self) -> Self {
        match self {
            Language::Korean => Language::English,
            Language::English => Language::Korean,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    #[default]
    Words,
    Sentences,
}

impl TextType {
    pub fn next(self) -> Self {
        match self {
            TextType::Words => TextType::Sentences,
            TextType::Sentences => TextType::Words,
        }
    }
}

/// What to generate. `length` counts words or sentences depending on
/// `text_type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    pub language: Language,
    pub text_type: TextType,
    pub length: usize,
    pub punctuation: bool,
    pub numbers: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            language: Language::Korean,
            text_type: TextType::Words,
            length: 25,
            punctuation: false,
            numbers: false,
        }
    }
}

pub trait TextGenerator {
    fn generate(&mut self, options: &GenerateOptions) -> String;
}

/// Pick `count` items, never the same item twice in a row unless the pool
/// only has one entry.
pub(crate) fn pick_without_repeats<'a>(
    pool: &'a [String],
    count: usize,
    rng: &mut SmallRng,
) -> Vec<&'a str> {
    let mut picked: Vec<&str> = Vec::with_capacity(count);
    let mut last: Option<usize> = None;
    if pool.is_empty() {
        return picked;
    }
    for _ in 0..count {
        let mut idx = rng.gen_range(0..pool.len());
        if pool.len() > 1 && Some(idx) == last {
            // shift to a neighbour rather than re-rolling
            idx = (idx + rng.gen_range(1..pool.len())) % pool.len();
        }
        picked.push(&pool[idx]);
        last = Some(idx);
    }
    picked
}

/// Build the generator for `options.text_type` and run it.
pub fn generate(pack: &LanguagePack, options: &GenerateOptions, rng: SmallRng) -> String {
    match options.text_type {
        TextType::Words => WordGenerator::new(pack, rng).generate(options),
        TextType::Sentences => SentenceGenerator::new(pack, rng).generate(options),
    }
}
