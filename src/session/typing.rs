use std::time::{Duration, Instant};

use crate::engine::live_stats::{LiveStats, StatsEngine, StatsInput, StatsOptions};
use crate::engine::perf::PerfMonitor;
use crate::generator::{Language, TextType};
use crate::session::input::{self, CharStatus, Keystroke, Mistake};
use crate::session::result::TestResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Countdown { until: Instant },
    Active,
    Paused { since: Instant },
    Completed,
}

/// One typing test: target text, what has been typed against it, and the
/// keystroke history the live stats are derived from.
pub struct TypingSession {
    pub target: Vec<char>,
    pub input: Vec<CharStatus>,
    language: Language,
    countdown: Duration,
    phase: Phase,
    keystrokes: Vec<Keystroke>,
    mistakes: Vec<Mistake>,
    /// Effective start; pushed forward by every pause so paused time never counts.
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    last_key_at: Option<Instant>,
    stats: StatsEngine,
}

impl TypingSession {
    pub fn new(target: &str, language: Language, countdown: Duration) -> Self {
        Self::with_options(target, language, countdown, StatsOptions::default())
    }

    pub fn with_options(
        target: &str,
        language: Language,
        countdown: Duration,
        options: StatsOptions,
    ) -> Self {
        Self {
            target: target.chars().collect(),
            input: Vec::new(),
            language,
            countdown,
            phase: Phase::Idle,
            keystrokes: Vec::new(),
            mistakes: Vec::new(),
            started_at: None,
            finished_at: None,
            last_key_at: None,
            stats: StatsEngine::new(options),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn current_index(&self) -> usize {
        self.input.len()
    }

    pub fn expected(&self) -> Option<char> {
        self.target.get(self.current_index()).copied()
    }

    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.keystrokes
    }

    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    pub fn stats(&self) -> &LiveStats {
        self.stats.current()
    }

    pub fn stats_engine(&self) -> &StatsEngine {
        &self.stats
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.current_index() as f64 / self.target.len() as f64
    }

    /// Seconds of active typing so far, excluding pauses.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let Some(start) = self.started_at else {
            return Duration::ZERO;
        };
        let end = match self.phase {
            Phase::Paused { since } => since,
            Phase::Completed => self.finished_at.unwrap_or(now),
            _ => now,
        };
        end.saturating_duration_since(start)
    }

    pub fn countdown_remaining(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            Phase::Countdown { until } => Some(until.saturating_duration_since(now)),
            _ => None,
        }
    }

    /// Leave idle: into the countdown when one is configured, otherwise straight
    /// to active.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        if self.countdown.is_zero() {
            self.activate(now);
        } else {
            self.phase = Phase::Countdown {
                until: now + self.countdown,
            };
        }
    }

    fn activate(&mut self, now: Instant) {
        self.phase = Phase::Active;
        self.started_at = Some(now);
        log::debug!(
            "test started: {} chars, {:?}",
            self.target.len(),
            self.language
        );
    }

    /// Returns whether the character was accepted.
    pub fn type_char(&mut self, ch: char, now: Instant, perf: &mut PerfMonitor) -> bool {
        if self.phase == Phase::Idle {
            self.activate(now);
        }
        if self.phase != Phase::Active {
            return false;
        }
        let position = self.current_index();
        let Some(expected) = self.expected() else {
            return false;
        };

        let previous = self.last_key_at.or(self.started_at).unwrap_or(now);
        let (keystroke, mistake) = input::judge(expected, ch, position, now, previous);
        self.keystrokes.push(keystroke);
        self.last_key_at = Some(now);
        match mistake {
            Some(m) => {
                self.mistakes.push(m);
                self.input.push(CharStatus::Incorrect(ch));
            }
            None => self.input.push(CharStatus::Correct),
        }

        if self.current_index() >= self.target.len() {
            self.complete(now, perf);
        } else {
            self.recompute(now, perf);
        }
        true
    }

    /// Drop the last typed character. Keystroke and mistake history stay.
    pub fn backspace(&mut self, now: Instant, perf: &mut PerfMonitor) -> bool {
        if self.phase != Phase::Active || self.input.pop().is_none() {
            return false;
        }
        self.recompute(now, perf);
        true
    }

    pub fn pause(&mut self, now: Instant) {
        if self.phase == Phase::Active {
            self.phase = Phase::Paused { since: now };
        }
    }

    pub fn resume(&mut self, now: Instant) {
        let Phase::Paused { since } = self.phase else {
            return;
        };
        let paused_for = now.saturating_duration_since(since);
        self.started_at = self.started_at.map(|s| s + paused_for);
        self.last_key_at = self.last_key_at.map(|t| t + paused_for);
        self.phase = Phase::Active;
    }

    /// Advance the countdown and refresh elapsed-time driven stats.
    pub fn tick(&mut self, now: Instant, perf: &mut PerfMonitor) {
        match self.phase {
            Phase::Countdown { until } if now >= until => self.activate(until),
            Phase::Active => self.recompute(now, perf),
            _ => {}
        }
    }

    /// Finish now, whether or not the whole target was typed.
    pub fn complete(&mut self, now: Instant, perf: &mut PerfMonitor) {
        let end = match self.phase {
            Phase::Active => now,
            Phase::Paused { since } => since,
            _ => return,
        };
        self.phase = Phase::Completed;
        self.finished_at = Some(end);
        let input = StatsInput {
            keystrokes: &self.keystrokes,
            mistakes: &self.mistakes,
            started_at: self.started_at,
            current_index: self.input.len(),
            now: end,
            language: self.language,
        };
        self.stats.finalize(&input, perf);
        log::debug!(
            "test finished: {}/{} chars, {} mistakes",
            self.input.len(),
            self.target.len(),
            self.mistakes.len()
        );
    }

    /// Back to idle with the same target and an empty history.
    pub fn reset(&mut self) {
        self.input.clear();
        self.keystrokes.clear();
        self.mistakes.clear();
        self.phase = Phase::Idle;
        self.started_at = None;
        self.finished_at = None;
        self.last_key_at = None;
        self.stats.reset();
    }

    fn recompute(&mut self, now: Instant, perf: &mut PerfMonitor) {
        let input = StatsInput {
            keystrokes: &self.keystrokes,
            mistakes: &self.mistakes,
            started_at: self.started_at,
            current_index: self.input.len(),
            now,
            language: self.language,
        };
        self.stats.recompute(&input, perf);
    }

    pub fn result(&self, text_type: TextType) -> Option<TestResult> {
        if !self.is_completed() {
            return None;
        }
        let stats = self.stats.current();
        let correct = self
            .input
            .iter()
            .filter(|s| matches!(s, CharStatus::Correct))
            .count();
        Some(TestResult {
            wpm: stats.wpm,
            raw_wpm: stats.raw_wpm,
            cpm: stats.cpm,
            raw_cpm: stats.raw_cpm,
            accuracy: stats.accuracy,
            consistency: stats.consistency,
            elapsed_secs: stats.time_elapsed,
            characters: self.input.len(),
            correct,
            errors: self.mistakes.len(),
            keystrokes: self.keystrokes.len(),
            language: self.language,
            text_type,
            completed: self.input.len() >= self.target.len(),
            timestamp: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn type_str(
        session: &mut TypingSession,
        text: &str,
        t0: Instant,
        step_ms: u64,
        perf: &mut PerfMonitor,
    ) {
        for (i, c) in text.chars().enumerate() {
            session.type_char(c, t0 + ms(step_ms * (i as u64 + 1)), perf);
        }
    }

    #[test]
    fn test_first_char_starts_from_idle() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("abc", Language::English, Duration::ZERO);
        let t0 = Instant::now();
        assert!(s.type_char('a', t0, &mut perf));
        assert!(s.is_active());
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.keystrokes()[0].time_delta, Duration::ZERO);
    }

    #[test]
    fn test_countdown_blocks_typing_until_it_ends() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("abc", Language::English, ms(3000));
        let t0 = Instant::now();
        s.start(t0);
        assert_eq!(s.countdown_remaining(t0 + ms(1000)), Some(ms(2000)));
        assert!(!s.type_char('a', t0 + ms(1000), &mut perf));
        s.tick(t0 + ms(2900), &mut perf);
        assert!(!s.is_active());
        s.tick(t0 + ms(3050), &mut perf);
        assert!(s.is_active());
        assert_eq!(s.elapsed(t0 + ms(4000)), ms(1000));
    }

    #[test]
    fn test_mistakes_and_completion() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("한글", Language::Korean, Duration::ZERO);
        let t0 = Instant::now();
        s.start(t0);
        s.type_char('한', t0 + ms(600), &mut perf);
        s.type_char('굴', t0 + ms(1200), &mut perf);
        assert!(s.is_completed());
        assert_eq!(s.mistakes().len(), 1);
        assert_eq!(s.mistakes()[0].position, 1);
        assert_eq!(s.mistakes()[0].expected, '글');

        let result = s.result(TextType::Words).unwrap();
        assert!(result.completed);
        assert_eq!(result.errors, 1);
        assert_eq!(result.correct, 1);
        assert_eq!(result.accuracy, 50.0);
        assert_eq!(result.language, Language::Korean);
    }

    #[test]
    fn test_backspace_keeps_history() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("abc", Language::English, Duration::ZERO);
        let t0 = Instant::now();
        s.start(t0);
        s.type_char('x', t0 + ms(200), &mut perf);
        assert!(s.backspace(t0 + ms(400), &mut perf));
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.keystrokes().len(), 1);
        assert_eq!(s.mistakes().len(), 1);
        assert!(!s.backspace(t0 + ms(500), &mut perf));
    }

    #[test]
    fn test_pause_excluded_from_elapsed() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("abcdefghij", Language::English, Duration::ZERO);
        let t0 = Instant::now();
        s.start(t0);
        type_str(&mut s, "abcde", t0, 100, &mut perf);
        s.pause(t0 + ms(500));
        assert!(s.is_paused());
        assert!(!s.type_char('f', t0 + ms(5000), &mut perf));
        assert_eq!(s.elapsed(t0 + ms(30000)), ms(500));

        s.resume(t0 + ms(10500));
        assert_eq!(s.elapsed(t0 + ms(11000)), ms(1000));
        s.type_char('f', t0 + ms(10600), &mut perf);
        assert_eq!(s.keystrokes()[5].time_delta, ms(100));
    }

    #[test]
    fn test_stats_frozen_while_paused() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("abcdefghij", Language::English, Duration::ZERO);
        let t0 = Instant::now();
        s.start(t0);
        type_str(&mut s, "abcdefgh", t0, 125, &mut perf);
        let before = *s.stats();
        assert_eq!(before.raw_cpm, 480.0);

        s.pause(t0 + ms(1000));
        s.tick(t0 + ms(20000), &mut perf);
        assert_eq!(*s.stats(), before);
    }

    #[test]
    fn test_manual_complete_is_partial() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("abcdef", Language::English, Duration::ZERO);
        let t0 = Instant::now();
        s.start(t0);
        type_str(&mut s, "abc", t0, 500, &mut perf);
        s.complete(t0 + ms(2000), &mut perf);
        let result = s.result(TextType::Words).unwrap();
        assert!(!result.completed);
        assert_eq!(result.characters, 3);
        assert_eq!(result.raw_cpm, 90.0);
    }

    #[test]
    fn test_result_only_after_completion() {
        let s = TypingSession::new("abc", Language::English, Duration::ZERO);
        assert!(s.result(TextType::Words).is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut perf = PerfMonitor::new();
        let mut s = TypingSession::new("ab", Language::English, Duration::ZERO);
        let t0 = Instant::now();
        type_str(&mut s, "ab", t0, 500, &mut perf);
        assert!(s.is_completed());
        s.reset();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.keystrokes().is_empty());
        assert!(s.mistakes().is_empty());
        assert_eq!(*s.stats(), LiveStats::default());
        assert_eq!(s.elapsed(t0 + ms(5000)), Duration::ZERO);
    }
}
