use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::tier::{ProgressSnapshot, Tier, TierThresholds};
use crate::session::result::TestResult;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierPromotion {
    pub from: Tier,
    pub to: Tier,
    pub at: DateTime<Utc>,
}

/// Cumulative performance across every recorded test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    pub total_tests: u32,
    pub average_cpm: f64,
    pub average_accuracy: f64,
    pub average_consistency: f64,
    pub best_wpm: f64,
    pub best_cpm: f64,
    pub total_time_secs: f64,
    pub tier: Tier,
    #[serde(default)]
    pub promotions: Vec<TierPromotion>,
    pub streak_days: u32,
    pub best_streak: u32,
    pub last_practice_date: Option<NaiveDate>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_tests: 0,
            average_cpm: 0.0,
            average_accuracy: 0.0,
            average_consistency: 0.0,
            best_wpm: 0.0,
            best_cpm: 0.0,
            total_time_secs: 0.0,
            tier: Tier::Bronze,
            promotions: Vec::new(),
            streak_days: 0,
            best_streak: 0,
            last_practice_date: None,
        }
    }
}

fn running_mean(mean: f64, count: u32, value: f64) -> f64 {
    (mean * count as f64 + value) / (count as f64 + 1.0)
}

impl ProgressData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            average_cpm: self.average_cpm,
            average_accuracy: self.average_accuracy,
            average_consistency: self.average_consistency,
            total_tests: self.total_tests,
        }
    }

    pub fn progress_to_next(&self, thresholds: &TierThresholds) -> f64 {
        thresholds.progress_to_next(self.tier, &self.snapshot())
    }

    /// Fold one finished test in. Partial tests count towards practice time
    /// and the streak only. Returns the promotion if this test earned one.
    pub fn record(
        &mut self,
        result: &TestResult,
        thresholds: &TierThresholds,
    ) -> Option<TierPromotion> {
        self.total_time_secs += result.elapsed_secs;
        self.touch_streak(result.timestamp.date_naive());

        if !result.completed {
            return None;
        }

        let n = self.total_tests;
        self.average_cpm = running_mean(self.average_cpm, n, result.cpm);
        self.average_accuracy = running_mean(self.average_accuracy, n, result.accuracy);
        self.average_consistency = running_mean(self.average_consistency, n, result.consistency);
        self.total_tests += 1;
        self.best_wpm = self.best_wpm.max(result.wpm);
        self.best_cpm = self.best_cpm.max(result.cpm);

        let classified = thresholds.classify(&self.snapshot());
        if classified <= self.tier {
            return None;
        }
        let promotion = TierPromotion {
            from: self.tier,
            to: classified,
            at: result.timestamp,
        };
        log::info!("tier promotion: {:?} -> {:?}", promotion.from, promotion.to);
        self.tier = classified;
        self.promotions.push(promotion.clone());
        Some(promotion)
    }

    fn touch_streak(&mut self, day: NaiveDate) {
        if self.last_practice_date == Some(day) {
            return;
        }
        self.streak_days = match self.last_practice_date {
            Some(last) if day.signed_duration_since(last).num_days() == 1 => self.streak_days + 1,
            _ => 1,
        };
        self.best_streak = self.best_streak.max(self.streak_days);
        self.last_practice_date = Some(day);
    }

    /// Fold `results`, oldest first, on top of what is already recorded.
    pub fn replay(mut self, results: &[TestResult], thresholds: &TierThresholds) -> Self {
        for result in results {
            self.record(result, thresholds);
        }
        self
    }

    /// Replay history oldest to newest into fresh progress.
    pub fn rebuild(history: &[TestResult], thresholds: &TierThresholds) -> Self {
        Self::default().replay(history, thresholds)
    }
}
