use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::progress::ProgressData;
use crate::engine::tier::TierThresholds;
use crate::session::result::TestResult;

const SCHEMA_VERSION: u32 = 1;

/// Oldest results are dropped past this many.
pub const HISTORY_LIMIT: usize = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub results: Vec<TestResult>,
    /// Everything that has fallen off the front of `results`, already folded.
    #[serde(default)]
    pub archived: ProgressData,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
            archived: ProgressData::default(),
        }
    }
}

impl HistoryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Append a result. Past [`HISTORY_LIMIT`] the oldest results move into
    /// `archived` so progress can still be rebuilt from the history.
    pub fn push(&mut self, result: TestResult, thresholds: &TierThresholds) {
        self.results.push(result);
        if self.results.len() > HISTORY_LIMIT {
            let excess = self.results.len() - HISTORY_LIMIT;
            for dropped in self.results.drain(..excess) {
                self.archived.record(&dropped, thresholds);
            }
        }
    }

    /// Progress as of the newest result: the archive plus a replay of what
    /// is still listed.
    pub fn progress(&self, thresholds: &TierThresholds) -> ProgressData {
        self.archived.clone().replay(&self.results, thresholds)
    }

    /// Drop the result at `index` and return it.
    pub fn remove(&mut self, index: usize) -> Option<TestResult> {
        (index < self.results.len()).then(|| self.results.remove(index))
    }
}

pub const EXPORT_VERSION: u32 = 1;

/// Progress is carried for convenience but is rebuildable from history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub taja_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub progress: ProgressData,
    pub history: HistoryData,
}
