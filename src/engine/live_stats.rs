use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::engine::perf::PerfMonitor;
use crate::generator::Language;
use crate::session::input::{Keystroke, Mistake};

/// Display-ready metrics for the test in progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveStats {
    pub wpm: f64,
    pub raw_wpm: f64,
    pub cpm: f64,
    pub raw_cpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    /// Seconds.
    pub time_elapsed: f64,
    pub characters_typed: usize,
    pub errors_count: usize,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            wpm: 0.0,
            raw_wpm: 0.0,
            cpm: 0.0,
            raw_cpm: 0.0,
            accuracy: 100.0,
            consistency: 100.0,
            time_elapsed: 0.0,
            characters_typed: 0,
            errors_count: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadlineMetric {
    Cpm,
    Wpm,
}

impl HeadlineMetric {
    /// Korean speed is conventionally quoted per character, English per word.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Korean => HeadlineMetric::Cpm,
            Language::English => HeadlineMetric::Wpm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HeadlineMetric::Cpm => "CPM",
            HeadlineMetric::Wpm => "WPM",
        }
    }

    pub fn value(self, stats: &LiveStats) -> f64 {
        match self {
            HeadlineMetric::Cpm => stats.cpm,
            HeadlineMetric::Wpm => stats.wpm,
        }
    }
}

fn default_accuracy_floor() -> f64 {
    0.85
}
fn default_min_sample_secs() -> f64 {
    0.5
}
fn default_consistency_penalty() -> f64 {
    60.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsOptions {
    /// Lowest factor accuracy may scale throughput by.
    #[serde(default = "default_accuracy_floor")]
    pub accuracy_floor: f64,
    /// Below this many elapsed seconds the previous snapshot is kept.
    #[serde(default = "default_min_sample_secs")]
    pub min_sample_secs: f64,
    /// Consistency points lost at a 100% mistake rate.
    #[serde(default = "default_consistency_penalty")]
    pub consistency_penalty: f64,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            accuracy_floor: default_accuracy_floor(),
            min_sample_secs: default_min_sample_secs(),
            consistency_penalty: default_consistency_penalty(),
        }
    }
}

pub struct StatsInput<'a> {
    pub keystrokes: &'a [Keystroke],
    pub mistakes: &'a [Mistake],
    pub started_at: Option<Instant>,
    pub current_index: usize,
    pub now: Instant,
    pub language: Language,
}

/// Pure arithmetic behind a snapshot. `elapsed_secs` must be positive.
pub fn calculate(
    keystrokes: &[Keystroke],
    mistake_count: usize,
    current_index: usize,
    elapsed_secs: f64,
    options: &StatsOptions,
) -> LiveStats {
    let n = keystrokes.len();
    let correct = keystrokes.iter().filter(|k| k.correct).count();
    let minutes = elapsed_secs / 60.0;

    let accuracy_rate = if n == 0 {
        1.0
    } else {
        correct as f64 / n as f64
    };
    // The floor is clamped so the corrected figures can never exceed raw ones.
    let factor = accuracy_rate.max(options.accuracy_floor.clamp(0.0, 1.0)).min(1.0);

    let raw_cpm = (n as f64 / minutes).round().max(0.0);
    let cpm = (raw_cpm * factor).round().max(0.0);
    let raw_wpm = ((current_index as f64 / 5.0) / minutes).round().max(0.0);
    let wpm = (raw_wpm * factor).round().max(0.0);

    let accuracy = (accuracy_rate * 100.0).round().clamp(0.0, 100.0);
    let mistake_rate = if n == 0 {
        0.0
    } else {
        mistake_count as f64 / n as f64
    };
    let consistency = (100.0 - mistake_rate * options.consistency_penalty)
        .round()
        .clamp(0.0, 100.0);

    LiveStats {
        wpm,
        raw_wpm,
        cpm,
        raw_cpm,
        accuracy,
        consistency,
        time_elapsed: elapsed_secs,
        characters_typed: current_index,
        errors_count: mistake_count,
    }
}

/// Holds the one published snapshot and overwrites it on each recompute.
#[derive(Clone, Debug)]
pub struct StatsEngine {
    options: StatsOptions,
    current: LiveStats,
    /// Hint from the latest input; picks the headline metric only.
    language: Language,
}

impl StatsEngine {
    pub fn new(options: StatsOptions) -> Self {
        Self {
            options,
            current: LiveStats::default(),
            language: Language::default(),
        }
    }

    pub fn current(&self) -> &LiveStats {
        &self.current
    }

    pub fn options(&self) -> &StatsOptions {
        &self.options
    }

    pub fn reset(&mut self) {
        self.current = LiveStats::default();
    }

    pub fn recompute(&mut self, input: &StatsInput<'_>, perf: &mut PerfMonitor) -> &LiveStats {
        let min_secs = self.options.min_sample_secs;
        self.update(input, perf, min_secs)
    }

    /// Closing snapshot for a finished test. Unlike `recompute` this ignores
    /// the minimum sample window so very short tests still get a figure.
    pub fn finalize(&mut self, input: &StatsInput<'_>, perf: &mut PerfMonitor) -> &LiveStats {
        self.update(input, perf, 0.0)
    }

    fn update(
        &mut self,
        input: &StatsInput<'_>,
        perf: &mut PerfMonitor,
        min_secs: f64,
    ) -> &LiveStats {
        self.language = input.language;
        let Some(started_at) = input.started_at else {
            self.reset();
            return &self.current;
        };

        let elapsed_secs = input.now.saturating_duration_since(started_at).as_secs_f64();
        if elapsed_secs < min_secs || elapsed_secs <= 0.0 {
            return &self.current;
        }

        let options = &self.options;
        self.current = perf.measure(|| {
            calculate(
                input.keystrokes,
                input.mistakes.len(),
                input.current_index,
                elapsed_secs,
                options,
            )
        });
        &self.current
    }

    /// The metric shown largest for the current text, with its value.
    pub fn headline(&self) -> (HeadlineMetric, f64) {
        let metric = HeadlineMetric::for_language(self.language);
        (metric, metric.value(&self.current))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn keystrokes(start: Instant, correct: usize, incorrect: usize) -> Vec<Keystroke> {
        (0..correct + incorrect)
            .map(|i| Keystroke {
                key: 'a',
                timestamp: start + Duration::from_millis(i as u64 * 50),
                correct: i >= incorrect,
                time_delta: Duration::from_millis(50),
            })
            .collect()
    }

    fn mistakes(start: Instant, count: usize) -> Vec<Mistake> {
        (0..count)
            .map(|i| Mistake {
                position: i,
                expected: 'a',
                actual: 'b',
                timestamp: start,
            })
            .collect()
    }

    fn run(
        engine: &mut StatsEngine,
        ks: &[Keystroke],
        ms: &[Mistake],
        start: Option<Instant>,
        index: usize,
        now: Instant,
    ) -> LiveStats {
        let mut perf = PerfMonitor::new();
        *engine.recompute(
            &StatsInput {
                keystrokes: ks,
                mistakes: ms,
                started_at: start,
                current_index: index,
                now,
                language: Language::English,
            },
            &mut perf,
        )
    }

    #[test]
    fn test_all_correct_one_second() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 10, 0);
        let mut engine = StatsEngine::new(StatsOptions::default());
        let stats = run(&mut engine, &ks, &[], Some(t0), 10, t0 + Duration::from_secs(1));
        assert_eq!(stats.raw_cpm, 600.0);
        assert_eq!(stats.cpm, 600.0);
        assert_eq!(stats.raw_wpm, 120.0);
        assert_eq!(stats.wpm, 120.0);
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.consistency, 100.0);
        assert_eq!(stats.characters_typed, 10);
        assert_eq!(stats.errors_count, 0);
    }

    #[test]
    fn test_accuracy_floor_limits_discount() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 8, 2);
        let ms = mistakes(t0, 2);
        let mut engine = StatsEngine::new(StatsOptions::default());
        let stats = run(&mut engine, &ks, &ms, Some(t0), 10, t0 + Duration::from_secs(1));
        assert_eq!(stats.raw_cpm, 600.0);
        assert_eq!(stats.cpm, 510.0);
        assert_eq!(stats.wpm, 102.0);
        assert_eq!(stats.accuracy, 80.0);
        assert_eq!(stats.consistency, 88.0);
        assert_eq!(stats.errors_count, 2);
    }

    #[test]
    fn test_accuracy_above_floor_is_used() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 19, 1);
        let ms = mistakes(t0, 1);
        let mut engine = StatsEngine::new(StatsOptions::default());
        let stats = run(&mut engine, &ks, &ms, Some(t0), 20, t0 + Duration::from_secs(2));
        // 20 keys in 2s = 600 raw, 95% accuracy
        assert_eq!(stats.raw_cpm, 600.0);
        assert_eq!(stats.cpm, 570.0);
        assert_eq!(stats.accuracy, 95.0);
        assert_eq!(stats.consistency, 97.0);
    }

    #[test]
    fn test_missing_start_resets_to_neutral() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 10, 0);
        let mut engine = StatsEngine::new(StatsOptions::default());
        run(&mut engine, &ks, &[], Some(t0), 10, t0 + Duration::from_secs(1));
        assert_ne!(*engine.current(), LiveStats::default());

        let stats = run(&mut engine, &ks, &[], None, 10, t0 + Duration::from_secs(2));
        assert_eq!(stats, LiveStats::default());
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.consistency, 100.0);
    }

    #[test]
    fn test_short_sample_keeps_previous_snapshot() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 10, 0);
        let mut engine = StatsEngine::new(StatsOptions::default());
        let before = run(&mut engine, &ks, &[], Some(t0), 10, t0 + Duration::from_secs(1));

        // A later start makes elapsed tiny.
        let late = t0 + Duration::from_secs(5);
        let after = run(&mut engine, &ks, &[], Some(late), 3, late + Duration::from_millis(499));
        assert_eq!(before, after);
    }

    #[test]
    fn test_no_keystrokes_is_neutral_percentages() {
        let t0 = Instant::now();
        let mut engine = StatsEngine::new(StatsOptions::default());
        let stats = run(&mut engine, &[], &[], Some(t0), 0, t0 + Duration::from_secs(30));
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.consistency, 100.0);
        assert_eq!(stats.raw_cpm, 0.0);
        assert_eq!(stats.wpm, 0.0);
    }

    #[test]
    fn test_invariants_hold_over_many_histories() {
        let t0 = Instant::now();
        let options = StatsOptions::default();
        for correct in 0..30 {
            for incorrect in 0..30 {
                for index in [0, 1, correct, correct + incorrect] {
                    let ks = keystrokes(t0, correct, incorrect);
                    let stats = calculate(&ks, incorrect, index, 3.7, &options);
                    assert!((0.0..=100.0).contains(&stats.accuracy));
                    assert!((0.0..=100.0).contains(&stats.consistency));
                    assert!(stats.cpm <= stats.raw_cpm);
                    assert!(stats.wpm <= stats.raw_wpm);
                    assert!(stats.cpm >= 0.0 && stats.wpm >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_floor_cannot_break_invariant() {
        let t0 = Instant::now();
        let options = StatsOptions {
            accuracy_floor: 1.7,
            ..StatsOptions::default()
        };
        let ks = keystrokes(t0, 5, 5);
        let stats = calculate(&ks, 5, 10, 1.0, &options);
        assert!(stats.cpm <= stats.raw_cpm);
        assert_eq!(stats.cpm, stats.raw_cpm);
    }

    #[test]
    fn test_recompute_records_perf_sample() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 3, 0);
        let mut engine = StatsEngine::new(StatsOptions::default());
        let mut perf = PerfMonitor::new();
        let input = StatsInput {
            keystrokes: &ks,
            mistakes: &[],
            started_at: Some(t0),
            current_index: 3,
            now: t0 + Duration::from_secs(1),
            language: Language::Korean,
        };
        engine.recompute(&input, &mut perf);
        assert_eq!(perf.len(), 1);

        let early = StatsInput {
            now: t0 + Duration::from_millis(100),
            ..input
        };
        engine.recompute(&early, &mut perf);
        assert_eq!(perf.len(), 1);
    }

    #[test]
    fn test_finalize_ignores_minimum_sample() {
        let t0 = Instant::now();
        let ks = keystrokes(t0, 2, 0);
        let mut engine = StatsEngine::new(StatsOptions::default());
        let mut perf = PerfMonitor::new();
        let input = StatsInput {
            keystrokes: &ks,
            mistakes: &[],
            started_at: Some(t0),
            current_index: 2,
            now: t0 + Duration::from_millis(200),
            language: Language::Korean,
        };
        assert_eq!(*engine.recompute(&input, &mut perf), LiveStats::default());
        let stats = *engine.finalize(&input, &mut perf);
        assert_eq!(stats.raw_cpm, 600.0);
        assert_eq!(engine.headline(), (HeadlineMetric::Cpm, 600.0));
    }

    #[test]
    fn test_headline_metric_by_language() {
        let stats = LiveStats {
            wpm: 40.0,
            cpm: 250.0,
            ..LiveStats::default()
        };
        assert_eq!(HeadlineMetric::for_language(Language::Korean).value(&stats), 250.0);
        assert_eq!(HeadlineMetric::for_language(Language::English).value(&stats), 40.0);
    }
}
