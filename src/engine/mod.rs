pub mod live_stats;
pub mod perf;
pub mod progress;
pub mod tier;

pub use live_stats::{HeadlineMetric, LiveStats, StatsEngine, StatsInput, StatsOptions};
pub use perf::PerfMonitor;
pub use progress::{ProgressData, TierPromotion};
pub use tier::Tier;
