use rand::Rng;
use rand::rngs::SmallRng;

use crate::generator::Language;

/// Post-processing pass that turns a run of words into punctuated
/// pseudo-sentences. English sentences also get a capital first letter.
pub fn apply_punctuation(text: &str, language: Language, rng: &mut SmallRng) -> String {
    let words: Vec<&str> = text.split(' ').filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return text.to_string();
    }

    let mut result = Vec::with_capacity(words.len());
    let mut words_since_period = 0;
    let mut words_since_comma = 0;
    let mut sentence_start = true;

    for (i, word) in words.iter().enumerate() {
        let mut w = if sentence_start && language == Language::English {
            capitalize_first(word)
        } else {
            word.to_string()
        };
        sentence_start = false;
        let is_last = i + 1 == words.len();

        words_since_period += 1;
        let end_sentence =
            words_since_period >= 6 && rng.gen_bool(0.2) || words_since_period >= 10;

        if end_sentence && !is_last {
            if rng.gen_bool(0.12) {
                w.push('?');
            } else if rng.gen_bool(0.08) {
                w.push('!');
            } else {
                w.push('.');
            }
            words_since_period = 0;
            words_since_comma = 0;
            sentence_start = true;
        } else if !is_last {
            words_since_comma += 1;
            if words_since_comma >= 3 && rng.gen_bool(0.2) {
                w.push(',');
                words_since_comma = 0;
            }
        }

        result.push(w);
    }

    if let Some(last) = result.last_mut() {
        if !matches!(last.chars().last(), Some('.' | '?' | '!')) {
            last.push('.');
        }
    }

    result.join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
