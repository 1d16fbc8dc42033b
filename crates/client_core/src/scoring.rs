use serde::{Deserialize, Serialize};

pub const DEFAULT_POINTS_PER_CORRECT: u32 = 10;
pub const DEFAULT_TOTAL_SCENARIOS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub points_per_correct: u32,
    pub total_scenarios: usize,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            points_per_correct: DEFAULT_POINTS_PER_CORRECT,
            total_scenarios: DEFAULT_TOTAL_SCENARIOS,
        }
    }
}

impl ScoringPolicy {
    /// Zero values fall back to the defaults.
    pub fn new(points_per_correct: u32, total_scenarios: usize) -> Self {
        let defaults = Self::default();
        Self {
            points_per_correct: if points_per_correct == 0 {
                defaults.points_per_correct
            } else {
                points_per_correct
            },
            total_scenarios: if total_scenarios == 0 {
                defaults.total_scenarios
            } else {
                total_scenarios
            },
        }
    }

    pub fn award(&self, is_correct: bool) -> u32 {
        if is_correct {
            self.points_per_correct
        } else {
            0
        }
    }

    pub fn max_score(&self, total_scenarios: usize) -> u32 {
        self.points_per_correct
            .saturating_mul(u32::try_from(total_scenarios).unwrap_or(u32::MAX))
    }
}

/// Rating shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    Excellent,
    VeryGood,
    Good,
    NeedsPractice,
}

impl PerformanceBand {
    pub fn from_score(score: u32, max_score: u32) -> Self {
        let percentage = percentage(score, max_score);
        if percentage >= 90.0 {
            PerformanceBand::Excellent
        } else if percentage >= 75.0 {
            PerformanceBand::VeryGood
        } else if percentage >= 60.0 {
            PerformanceBand::Good
        } else {
            PerformanceBand::NeedsPractice
        }
    }
}

/// Score as a percentage of `max_score`, clamped to 0..=100.
pub fn percentage(score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    (f64::from(score) / f64::from(max_score) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awards_points_only_for_correct_answers() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.award(true), 10);
        assert_eq!(policy.award(false), 0);
        assert_eq!(policy.max_score(5), 50);
    }

    #[test]
    fn zero_policy_values_use_defaults() {
        assert_eq!(ScoringPolicy::new(0, 0), ScoringPolicy::default());
        assert_eq!(ScoringPolicy::new(25, 4).max_score(4), 100);
    }

    #[test]
    fn bands_follow_percentage_thresholds() {
        assert_eq!(PerformanceBand::from_score(50, 50), PerformanceBand::Excellent);
        assert_eq!(PerformanceBand::from_score(40, 50), PerformanceBand::VeryGood);
        assert_eq!(PerformanceBand::from_score(30, 50), PerformanceBand::Good);
        assert_eq!(PerformanceBand::from_score(20, 50), PerformanceBand::NeedsPractice);
        assert_eq!(PerformanceBand::from_score(0, 0), PerformanceBand::NeedsPractice);
    }
}
