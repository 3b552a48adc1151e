use crate::hangul::{decompose_hangul, jamo_len};

/// Visible stand-in for a space in the jamo strip.
pub const SPACE_PLACEHOLDER: char = '\u{2423}'; // ␣

pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Expand `text` into the sequence of glyphs a learner types: syllables become
/// their jamo, spaces become [`SPACE_PLACEHOLDER`], everything else is kept.
pub fn typing_visualization(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        if c == ' ' {
            out.push(SPACE_PLACEHOLDER);
        } else {
            out.extend(decompose_hangul(c));
        }
    }
    out
}

/// A fixed-width slice of the jamo sequence around the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlidingWindow {
    /// Always exactly `window_size` cells; `None` pads past the end of the text.
    pub cells: Vec<Option<char>>,
    /// Cursor position relative to `cells[0]`. Equals `cells.len()` when the
    /// cursor sits after the last glyph.
    pub cursor_offset: usize,
}

pub fn sliding_visualization(text: &str, current_index: usize, window_size: usize) -> SlidingWindow {
    let sequence = typing_visualization(text);

    // Jamo position of the cursor: everything typed so far, expanded.
    let position: usize = text.chars().take(current_index).map(jamo_len).sum();

    let start = if sequence.len() <= window_size {
        0
    } else {
        position
            .saturating_sub(window_size / 2)
            .min(sequence.len() - window_size)
    };

    let mut cells: Vec<Option<char>> = sequence
        .iter()
        .skip(start)
        .take(window_size)
        .map(|&c| Some(c))
        .collect();
    cells.resize(window_size, None);

    SlidingWindow {
        cells,
        cursor_offset: position.saturating_sub(start).min(window_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualization_expands_syllables_and_spaces() {
        let seq = typing_visualization("한 a가");
        assert_eq!(
            seq,
            vec!['ㅎ', 'ㅏ', 'ㄴ', SPACE_PLACEHOLDER, 'a', 'ㄱ', 'ㅏ']
        );
    }

    #[test]
    fn test_visualization_empty() {
        assert!(typing_visualization("").is_empty());
    }

    #[test]
    fn test_window_always_has_window_size_cells() {
        for text in ["", "a", "한글", "안녕하세요 반갑습니다", "hello world"] {
            for idx in 0..=text.chars().count() + 2 {
                for size in [1, 3, 5, 8] {
                    let w = sliding_visualization(text, idx, size);
                    assert_eq!(w.cells.len(), size, "text={text:?} idx={idx} size={size}");
                    assert!(w.cursor_offset <= size);
                }
            }
        }
    }

    #[test]
    fn test_short_text_is_padded() {
        let w = sliding_visualization("가", 0, 5);
        assert_eq!(w.cells, vec![Some('ㄱ'), Some('ㅏ'), None, None, None]);
        assert_eq!(w.cursor_offset, 0);
    }

    #[test]
    fn test_window_centres_on_cursor() {
        // 한(3) 글(3) 자(2) = ㅎㅏㄴㄱㅡㄹㅈㅏ; cursor on 글 is jamo position 3
        let w = sliding_visualization("한글자", 1, 5);
        assert_eq!(
            w.cells,
            vec![Some('ㅏ'), Some('ㄴ'), Some('ㄱ'), Some('ㅡ'), Some('ㄹ')]
        );
        assert_eq!(w.cursor_offset, 2);
    }

    #[test]
    fn test_window_clamps_at_both_ends() {
        let start = sliding_visualization("한글자", 0, 5);
        assert_eq!(start.cells[0], Some('ㅎ'));
        assert_eq!(start.cursor_offset, 0);

        let end = sliding_visualization("한글자", 3, 5);
        assert_eq!(end.cells[4], Some('ㅏ'));
        assert_eq!(end.cursor_offset, 5);
    }

    #[test]
    fn test_zero_window() {
        let w = sliding_visualization("한글", 1, 0);
        assert!(w.cells.is_empty());
        assert_eq!(w.cursor_offset, 0);
    }
}
