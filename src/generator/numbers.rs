use rand::Rng;
use rand::rngs::SmallRng;

use crate::generator::Language;

const EN_UNITS: [&str; 6] = ["items", "miles", "days", "lines", "times", "pages"];
const EN_PREFIXES: [&str; 5] = ["room", "page", "step", "line", "bus"];
// Korean counters attach to the number directly: 3개, 12명
const KO_COUNTERS: [&str; 8] = ["개", "명", "번", "일", "시간", "원", "층", "권"];

/// Post-processing pass that swaps some words for number expressions.
pub fn apply_numbers(text: &str, language: Language, rng: &mut SmallRng) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    text.split(' ')
        .map(|word| {
            if rng.gen_bool(0.15) {
                number_expr(language, rng)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn number_expr(language: Language, rng: &mut SmallRng) -> String {
    match rng.gen_range(0..4) {
        // Simple count: "3" or "42"
        0 => random_number(1, 3, rng),
        // Year-like: "2024"
        1 => format!("{}", rng.gen_range(1950..=2030)),
        2 => {
            let num = random_number(1, 2, rng);
            match language {
                Language::Korean => {
                    let counter = KO_COUNTERS[rng.gen_range(0..KO_COUNTERS.len())];
                    format!("{num}{counter}")
                }
                Language::English => {
                    let unit = EN_UNITS[rng.gen_range(0..EN_UNITS.len())];
                    format!("{num} {unit}")
                }
            }
        }
        _ => match language {
            Language::Korean => format!("{}월", rng.gen_range(1..=12)),
            Language::English => {
                let prefix = EN_PREFIXES[rng.gen_range(0..EN_PREFIXES.len())];
                format!("{prefix} {}", random_number(1, 3, rng))
            }
        },
    }
}

/// Digit string without a leading zero.
fn random_number(min_len: usize, max_len: usize, rng: &mut SmallRng) -> String {
    let len = rng.gen_range(min_len..=max_len);
    (0..len)
        .map(|i| {
            let low = if i == 0 { 1 } else { 0 };
            char::from(b'0' + rng.gen_range(low..=9u8))
        })
        .collect()
}
