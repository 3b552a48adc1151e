use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_SAMPLE_LIMIT: usize = 100;

/// Rolling window of recompute timings. Owned by the app and handed to
/// whoever needs to record into it.
#[derive(Clone, Debug)]
pub struct PerfMonitor {
    samples: VecDeque<Duration>,
    limit: usize,
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_SAMPLE_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            samples: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn record(&mut self, sample: Duration) {
        if self.samples.len() == self.limit {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Run `f`, record how long it took and hand back its result.
    pub fn measure<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let started = Instant::now();
        let out = f();
        self.record(started.elapsed());
        out
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<Duration> {
        self.samples.back().copied()
    }

    pub fn average(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
