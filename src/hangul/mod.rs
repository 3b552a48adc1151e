//! Hangul syllable decomposition and composition.
//!
//! Jamo are returned as Unicode compatibility jamo (U+3131..U+3163), which is
//! what a user sees on a keyboard sticker and what the visualization strip
//! renders.

pub mod composer;
pub mod dubeolsik;
pub mod visualize;

pub use visualize::{SlidingWindow, sliding_visualization, typing_visualization};

pub const SYLLABLE_BASE: u32 = 0xAC00;
pub const SYLLABLE_LAST: u32 = 0xD7A3;

pub const CHOSEONG_COUNT: u32 = 19;
pub const JUNGSEONG_COUNT: u32 = 21;
pub const JONGSEONG_COUNT: u32 = 28;

/// Syllables per initial consonant (21 vowels * 28 finals).
const CHOSEONG_STRIDE: u32 = JUNGSEONG_COUNT * JONGSEONG_COUNT;

pub const CHOSEONG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ',
    'ㅍ', 'ㅎ',
];

pub const JUNGSEONG: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ', 'ㅟ',
    'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Final consonants for indices 1..=27. Index 0 means "no final" and has no glyph.
pub const JONGSEONG: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ', 'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ', 'ㅁ', 'ㅂ',
    'ㅄ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

pub fn is_hangul_syllable(c: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(c as u32))
}

/// Split a syllable into (initial, vowel, final) indices. Final index 0 means none.
pub fn syllable_indices(c: char) -> Option<(u32, u32, u32)> {
    if !is_hangul_syllable(c) {
        return None;
    }
    let code = c as u32 - SYLLABLE_BASE;
    Some((
        code / CHOSEONG_STRIDE,
        (code % CHOSEONG_STRIDE) / JONGSEONG_COUNT,
        code % JONGSEONG_COUNT,
    ))
}

/// Decompose a syllable into its jamo. Anything that is not a precomposed
/// syllable is returned unchanged as a single element.
pub fn decompose_hangul(c: char) -> Vec<char> {
    match syllable_indices(c) {
        Some((cho, jung, jong)) => {
            let mut jamo = Vec::with_capacity(3);
            jamo.push(CHOSEONG[cho as usize]);
            jamo.push(JUNGSEONG[jung as usize]);
            if jong != 0 {
                jamo.push(JONGSEONG[jong as usize - 1]);
            }
            jamo
        }
        None => vec![c],
    }
}

/// Number of visualization cells `c` occupies (1..=3).
pub fn jamo_len(c: char) -> usize {
    match syllable_indices(c) {
        Some((_, _, 0)) => 2,
        Some(_) => 3,
        None => 1,
    }
}

pub fn compose_hangul(cho: u32, jung: u32, jong: u32) -> Option<char> {
    if cho >= CHOSEONG_COUNT || jung >= JUNGSEONG_COUNT || jong >= JONGSEONG_COUNT {
        return None;
    }
    char::from_u32(SYLLABLE_BASE + cho * CHOSEONG_STRIDE + jung * JONGSEONG_COUNT + jong)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllable_range_bounds() {
        assert!(is_hangul_syllable('가'));
        assert!(is_hangul_syllable('힣'));
        assert!(!is_hangul_syllable('ㄱ'));
        assert!(!is_hangul_syllable('a'));
        assert!(!is_hangul_syllable(char::from_u32(0xD7A4).unwrap()));
    }

    #[test]
    fn test_decompose_with_final() {
        assert_eq!(decompose_hangul('한'), vec!['ㅎ', 'ㅏ', 'ㄴ']);
        assert_eq!(decompose_hangul('글'), vec!['ㄱ', 'ㅡ', 'ㄹ']);
        assert_eq!(decompose_hangul('값'), vec!['ㄱ', 'ㅏ', 'ㅄ']);
    }

    #[test]
    fn test_decompose_without_final() {
        assert_eq!(decompose_hangul('가'), vec!['ㄱ', 'ㅏ']);
        assert_eq!(decompose_hangul('뭐'), vec!['ㅁ', 'ㅝ']);
    }

    #[test]
    fn test_non_syllable_passthrough() {
        for c in ['a', 'Z', '1', ' ', '.', 'ㄱ', 'ㅏ', '漢', 'é'] {
            assert_eq!(decompose_hangul(c), vec![c]);
        }
    }

    #[test]
    fn test_every_syllable_round_trips() {
        for code in SYLLABLE_BASE..=SYLLABLE_LAST {
            let c = char::from_u32(code).unwrap();
            let jamo = decompose_hangul(c);
            assert!(jamo.len() == 2 || jamo.len() == 3, "{c} -> {jamo:?}");
            assert_eq!(jamo.len(), jamo_len(c));

            let (cho, jung, jong) = syllable_indices(c).unwrap();
            assert_eq!(compose_hangul(cho, jung, jong), Some(c));
        }
    }

    #[test]
    fn test_compose_rejects_out_of_range() {
        assert_eq!(compose_hangul(19, 0, 0), None);
        assert_eq!(compose_hangul(0, 21, 0), None);
        assert_eq!(compose_hangul(0, 0, 28), None);
        assert_eq!(compose_hangul(18, 0, 4), Some('한'));
    }
}
