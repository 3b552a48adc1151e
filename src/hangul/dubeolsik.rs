//! Standard 2-set (Dubeolsik) Korean layout over a QWERTY keyboard.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Jamo {
    /// `jong` is `None` for the consonants that cannot close a syllable (ㄸ ㅃ ㅉ).
    Consonant { cho: u32, jong: Option<u32> },
    Vowel { jung: u32 },
}

/// Map a Latin key to the jamo printed on it. Shift only matters for the
/// doubled consonants and ㅒ/ㅖ; other capitals behave like their lowercase key.
pub fn map_key(key: char) -> Option<Jamo> {
    let key = match key {
        'R' | 'E' | 'Q' | 'T' | 'W' | 'O' | 'P' => key,
        _ => key.to_ascii_lowercase(),
    };

    let consonant = |cho, jong| Some(Jamo::Consonant { cho, jong });
    let vowel = |jung| Some(Jamo::Vowel { jung });

    match key {
        'r' => consonant(0, Some(1)),   // ㄱ
        'R' => consonant(1, Some(2)),   // ㄲ
        's' => consonant(2, Some(4)),   // ㄴ
        'e' => consonant(3, Some(7)),   // ㄷ
        'E' => consonant(4, None),      // ㄸ
        'f' => consonant(5, Some(8)),   // ㄹ
        'a' => consonant(6, Some(16)),  // ㅁ
        'q' => consonant(7, Some(17)),  // ㅂ
        'Q' => consonant(8, None),      // ㅃ
        't' => consonant(9, Some(19)),  // ㅅ
        'T' => consonant(10, Some(20)), // ㅆ
        'd' => consonant(11, Some(21)), // ㅇ
        'w' => consonant(12, Some(22)), // ㅈ
        'W' => consonant(13, None),     // ㅉ
        'c' => consonant(14, Some(23)), // ㅊ
        'z' => consonant(15, Some(24)), // ㅋ
        'x' => consonant(16, Some(25)), // ㅌ
        'v' => consonant(17, Some(26)), // ㅍ
        'g' => consonant(18, Some(27)), // ㅎ
        'k' => vowel(0),                // ㅏ
        'o' => vowel(1),                // ㅐ
        'i' => vowel(2),                // ㅑ
        'O' => vowel(3),                // ㅒ
        'j' => vowel(4),                // ㅓ
        'p' => vowel(5),                // ㅔ
        'u' => vowel(6),                // ㅕ
        'P' => vowel(7),                // ㅖ
        'h' => vowel(8),                // ㅗ
        'y' => vowel(12),               // ㅛ
        'n' => vowel(13),               // ㅜ
        'b' => vowel(17),               // ㅠ
        'm' => vowel(18),               // ㅡ
        'l' => vowel(20),               // ㅣ
        _ => None,
    }
}

pub fn combine_vowels(first: u32, second: u32) -> Option<u32> {
    match (first, second) {
        (8, 0) => Some(9),    // ㅗ + ㅏ = ㅘ
        (8, 1) => Some(10),   // ㅗ + ㅐ = ㅙ
        (8, 20) => Some(11),  // ㅗ + ㅣ = ㅚ
        (13, 4) => Some(14),  // ㅜ + ㅓ = ㅝ
        (13, 5) => Some(15),  // ㅜ + ㅔ = ㅞ
        (13, 20) => Some(16), // ㅜ + ㅣ = ㅟ
        (18, 20) => Some(19), // ㅡ + ㅣ = ㅢ
        _ => None,
    }
}

pub fn combine_finals(first: u32, second: u32) -> Option<u32> {
    match (first, second) {
        (1, 19) => Some(3),   // ㄱ + ㅅ = ㄳ
        (4, 22) => Some(5),   // ㄴ + ㅈ = ㄵ
        (4, 27) => Some(6),   // ㄴ + ㅎ = ㄶ
        (8, 1) => Some(9),    // ㄹ + ㄱ = ㄺ
        (8, 16) => Some(10),  // ㄹ + ㅁ = ㄻ
        (8, 17) => Some(11),  // ㄹ + ㅂ = ㄼ
        (8, 19) => Some(12),  // ㄹ + ㅅ = ㄽ
        (8, 25) => Some(13),  // ㄹ + ㅌ = ㄾ
        (8, 26) => Some(14),  // ㄹ + ㅍ = ㄿ
        (8, 27) => Some(15),  // ㄹ + ㅎ = ㅀ
        (17, 19) => Some(18), // ㅂ + ㅅ = ㅄ
        _ => None,
    }
}

/// Split a compound final into (remaining final, initial of the next syllable).
pub fn split_final(jong: u32) -> Option<(u32, u32)> {
    match jong {
        3 => Some((1, 9)),   // ㄳ -> ㄱ + ㅅ
        5 => Some((4, 12)),  // ㄵ -> ㄴ + ㅈ
        6 => Some((4, 18)),  // ㄶ -> ㄴ + ㅎ
        9 => Some((8, 0)),   // ㄺ -> ㄹ + ㄱ
        10 => Some((8, 6)),  // ㄻ -> ㄹ + ㅁ
        11 => Some((8, 7)),  // ㄼ -> ㄹ + ㅂ
        12 => Some((8, 9)),  // ㄽ -> ㄹ + ㅅ
        13 => Some((8, 16)), // ㄾ -> ㄹ + ㅌ
        14 => Some((8, 17)), // ㄿ -> ㄹ + ㅍ
        15 => Some((8, 18)), // ㅀ -> ㄹ + ㅎ
        18 => Some((17, 9)), // ㅄ -> ㅂ + ㅅ
        _ => None,
    }
}

/// Initial-consonant index for a simple final that moves to the next syllable.
pub fn final_to_initial(jong: u32) -> Option<u32> {
    match jong {
        1 => Some(0),
        2 => Some(1),
        4 => Some(2),
        7 => Some(3),
        8 => Some(5),
        16 => Some(6),
        17 => Some(7),
        19 => Some(9),
        20 => Some(10),
        21 => Some(11),
        22 => Some(12),
        23 => Some(14),
        24 => Some(15),
        25 => Some(16),
        26 => Some(17),
        27 => Some(18),
        _ => None,
    }
}
