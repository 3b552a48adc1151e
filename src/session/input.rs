use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Incorrect(char),
}

/// One committed key. Appended once, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    pub key: char,
    pub timestamp: Instant,
    pub correct: bool,
    /// Since the previous keystroke, or since the start for the first one.
    pub time_delta: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mistake {
    /// Index into the target text.
    pub position: usize,
    pub expected: char,
    pub actual: char,
    pub timestamp: Instant,
}

/// Compare `actual` against the expected character at `position` and build
/// the records for it. The mistake is `None` on a match.
pub fn judge(
    expected: char,
    actual: char,
    position: usize,
    now: Instant,
    previous: Instant,
) -> (Keystroke, Option<Mistake>) {
    let correct = expected == actual;
    let keystroke = Keystroke {
        key: actual,
        timestamp: now,
        correct,
        time_delta: now.saturating_duration_since(previous),
    };
    let mistake = (!correct).then_some(Mistake {
        position,
        expected,
        actual,
        timestamp: now,
    });
    (keystroke, mistake)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_has_no_mistake() {
        let t0 = Instant::now();
        let (k, m) = judge('한', '한', 0, t0 + Duration::from_millis(300), t0);
        assert!(k.correct);
        assert_eq!(k.time_delta, Duration::from_millis(300));
        assert!(m.is_none());
    }

    #[test]
    fn test_mismatch_records_position() {
        let t0 = Instant::now();
        let (k, m) = judge('a', 's', 7, t0, t0);
        assert!(!k.correct);
        let m = m.unwrap();
        assert_eq!(m.position, 7);
        assert_eq!(m.expected, 'a');
        assert_eq!(m.actual, 's');
    }

    #[test]
    fn test_clock_going_backwards_is_zero_delta() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(1);
        let (k, _) = judge('a', 'a', 0, t0, later);
        assert_eq!(k.time_delta, Duration::ZERO);
    }
}
