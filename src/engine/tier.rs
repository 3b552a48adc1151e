use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
        Tier::Master,
    ];

    pub fn next(self) -> Option<Tier> {
        let idx = self as usize;
        Tier::ALL.get(idx + 1).copied()
    }

    /// Locale key for the tier name.
    pub fn key(self) -> &'static str {
        match self {
            Tier::Bronze => "tier.bronze",
            Tier::Silver => "tier.silver",
            Tier::Gold => "tier.gold",
            Tier::Platinum => "tier.platinum",
            Tier::Diamond => "tier.diamond",
            Tier::Master => "tier.master",
        }
    }
}

/// What a snapshot must reach, on every axis, to hold a tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TierRequirement {
    pub min_cpm: f64,
    pub min_accuracy: f64,
    pub min_consistency: f64,
    pub min_tests: u32,
}

impl TierRequirement {
    const fn new(min_cpm: f64, min_accuracy: f64, min_consistency: f64, min_tests: u32) -> Self {
        Self {
            min_cpm,
            min_accuracy,
            min_consistency,
            min_tests,
        }
    }

    pub fn is_met_by(&self, snapshot: &ProgressSnapshot) -> bool {
        snapshot.average_cpm >= self.min_cpm
            && snapshot.average_accuracy >= self.min_accuracy
            && snapshot.average_consistency >= self.min_consistency
            && snapshot.total_tests >= self.min_tests
    }
}

/// Requirements for every tier above Bronze. Read from the `[tiers]` table
/// of the config; a tier left out keeps its built-in requirement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub silver: TierRequirement,
    pub gold: TierRequirement,
    pub platinum: TierRequirement,
    pub diamond: TierRequirement,
    pub master: TierRequirement,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            silver: TierRequirement::new(150.0, 85.0, 80.0, 5),
            gold: TierRequirement::new(250.0, 90.0, 85.0, 20),
            platinum: TierRequirement::new(350.0, 93.0, 88.0, 50),
            diamond: TierRequirement::new(450.0, 95.0, 90.0, 100),
            master: TierRequirement::new(550.0, 97.0, 93.0, 200),
        }
    }
}

impl TierThresholds {
    /// Bronze has no requirement.
    pub fn requirement(&self, tier: Tier) -> TierRequirement {
        match tier {
            Tier::Bronze => TierRequirement::default(),
            Tier::Silver => self.silver,
            Tier::Gold => self.gold,
            Tier::Platinum => self.platinum,
            Tier::Diamond => self.diamond,
            Tier::Master => self.master,
        }
    }

    /// Highest tier whose every requirement the snapshot meets.
    pub fn classify(&self, snapshot: &ProgressSnapshot) -> Tier {
        Tier::ALL
            .into_iter()
            .rev()
            .find(|&tier| self.requirement(tier).is_met_by(snapshot))
            .unwrap_or_default()
    }

    /// Fraction (0..=1) of the way from `current` to the tier above it,
    /// averaged over the four requirements. Always 1.0 at the top tier.
    pub fn progress_to_next(&self, current: Tier, snapshot: &ProgressSnapshot) -> f64 {
        let Some(next) = current.next() else {
            return 1.0;
        };
        let req = self.requirement(next);
        let parts = [
            ratio(snapshot.average_cpm, req.min_cpm),
            ratio(snapshot.average_accuracy, req.min_accuracy),
            ratio(snapshot.average_consistency, req.min_consistency),
            ratio(snapshot.total_tests as f64, req.min_tests as f64),
        ];
        parts.iter().sum::<f64>() / parts.len() as f64
    }
}

/// Cumulative figures a tier is judged on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressSnapshot {
    pub average_cpm: f64,
    pub average_accuracy: f64,
    pub average_consistency: f64,
    pub total_tests: u32,
}

fn ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        1.0
    } else {
        (value / target).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(cpm: f64, acc: f64, cons: f64, tests: u32) -> ProgressSnapshot {
        ProgressSnapshot {
            average_cpm: cpm,
            average_accuracy: acc,
            average_consistency: cons,
            total_tests: tests,
        }
    }

    fn classify(snapshot: &ProgressSnapshot) -> Tier {
        TierThresholds::default().classify(snapshot)
    }

    fn progress_to_next(current: Tier, snapshot: &ProgressSnapshot) -> f64 {
        TierThresholds::default().progress_to_next(current, snapshot)
    }

    #[test]
    fn test_new_user_is_bronze() {
        assert_eq!(classify(&ProgressSnapshot::default()), Tier::Bronze);
    }

    #[test]
    fn test_every_requirement_must_be_met() {
        assert_eq!(classify(&snap(300.0, 92.0, 90.0, 4)), Tier::Bronze);
        assert_eq!(classify(&snap(300.0, 92.0, 90.0, 5)), Tier::Silver);
        assert_eq!(classify(&snap(300.0, 92.0, 90.0, 20)), Tier::Gold);
        assert_eq!(classify(&snap(300.0, 84.0, 90.0, 20)), Tier::Bronze);
    }

    #[test]
    fn test_master() {
        assert_eq!(classify(&snap(600.0, 99.0, 99.0, 500)), Tier::Master);
        assert_eq!(Tier::Master.next(), None);
        assert_eq!(progress_to_next(Tier::Master, &ProgressSnapshot::default()), 1.0);
    }

    #[test]
    fn test_tiers_are_ordered() {
        for pair in Tier::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
    }

    #[test]
    fn test_progress_to_next() {
        assert_eq!(progress_to_next(Tier::Bronze, &ProgressSnapshot::default()), 0.0);
        let half = snap(75.0, 42.5, 40.0, 2);
        // 0.5 + 0.5 + 0.5 + 0.4
        assert!((progress_to_next(Tier::Bronze, &half) - 0.475).abs() < 1e-9);
        let over = snap(1000.0, 100.0, 100.0, 1000);
        assert_eq!(progress_to_next(Tier::Bronze, &over), 1.0);
    }

    #[test]
    fn test_lowered_threshold_promotes_earlier() {
        let snapshot = snap(120.0, 88.0, 82.0, 3);
        assert_eq!(classify(&snapshot), Tier::Bronze);

        let mut thresholds = TierThresholds::default();
        thresholds.silver = TierRequirement::new(100.0, 85.0, 80.0, 3);
        assert_eq!(thresholds.classify(&snapshot), Tier::Silver);
        assert_eq!(thresholds.progress_to_next(Tier::Bronze, &snapshot), 1.0);
    }

    #[test]
    fn test_thresholds_from_partial_toml() {
        let thresholds: TierThresholds = toml::from_str(
            "[gold]\nmin_cpm = 200.0\nmin_accuracy = 88.0\nmin_consistency = 80.0\nmin_tests = 10\n",
        )
        .unwrap();
        assert_eq!(thresholds.gold.min_cpm, 200.0);
        assert_eq!(thresholds.silver, TierThresholds::default().silver);
        assert_eq!(thresholds.requirement(Tier::Bronze), TierRequirement::default());
    }
}
