//! # Loop parameters
//!
//! The (weights, thresholds, penalties) triple that evolves across refinement
//! passes. Category defaults are loaded once at engine init; each pass derives
//! a fresh snapshot from the previous one, nothing is shared between runs.
//!
//! Weights are kept normalized (sum = 1) after every pass.

use serde::{Deserialize, Serialize};

/// Absolute upper bound for `max_sensationalism`. No configuration and no
/// adjustment pass may push the threshold above this.
pub const SENSATIONALISM_CEILING: f32 = 0.4;

/// Relative importance of each score component in the item total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub optimism: f32,
    pub forward_progress: f32,
    pub credibility: f32,
    pub freshness: f32,
    pub topic_fit: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            optimism: 0.25,
            forward_progress: 0.25,
            credibility: 0.20,
            freshness: 0.15,
            topic_fit: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f32 {
        self.optimism + self.forward_progress + self.credibility + self.freshness + self.topic_fit
    }

    /// Divide every weight by the current total so they sum to 1.
    ///
    /// A non-positive or non-finite total leaves the weights untouched; this
    /// never produces NaN or infinity.
    pub fn renormalized(self) -> Self {
        let total = self.sum();
        if !total.is_finite() || total <= 0.0 {
            return self;
        }
        Self {
            optimism: self.optimism / total,
            forward_progress: self.forward_progress / total,
            credibility: self.credibility / total,
            freshness: self.freshness / total,
            topic_fit: self.topic_fit / total,
        }
    }

    pub(crate) fn as_named(&self) -> [(&'static str, f32); 5] {
        [
            ("optimism", self.optimism),
            ("forward_progress", self.forward_progress),
            ("credibility", self.credibility),
            ("freshness", self.freshness),
            ("topic_fit", self.topic_fit),
        ]
    }
}

/// Negative contributions subtracted from the item total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPenalties {
    pub sensationalism: f32,
}

impl Default for ScoringPenalties {
    fn default() -> Self {
        Self {
            sensationalism: 0.30,
        }
    }
}

/// Per-category acceptance and selection bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryThresholds {
    pub target_item_count: usize,
    pub min_item_count: usize,
    pub max_item_count: usize,
    /// Hard filter in the selector and acceptance cap on the average.
    pub max_sensationalism: f32,
    pub min_optimism: f32,
    pub min_forward_progress_pct: f32,
    pub max_same_source_items: usize,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            target_item_count: 10,
            min_item_count: 5,
            max_item_count: 15,
            max_sensationalism: 0.30,
            min_optimism: 0.30,
            min_forward_progress_pct: 0.40,
            max_same_source_items: 3,
        }
    }
}

/// One immutable snapshot of the parameters used by a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoopParams {
    pub weights: ScoringWeights,
    pub thresholds: CategoryThresholds,
    pub penalties: ScoringPenalties,
}

impl LoopParams {
    pub fn new(
        weights: ScoringWeights,
        thresholds: CategoryThresholds,
        penalties: ScoringPenalties,
    ) -> Self {
        Self {
            weights,
            thresholds,
            penalties,
        }
    }

    /// Same parameters with the weights renormalized to sum to 1.
    pub fn with_renormalized_weights(self) -> Self {
        Self {
            weights: self.weights.renormalized(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn renormalize_divides_by_total() {
        let w = ScoringWeights {
            optimism: 0.30,
            forward_progress: 0.25,
            credibility: 0.20,
            freshness: 0.15,
            topic_fit: 0.15,
        }
        .renormalized();
        assert!((w.sum() - 1.0).abs() < 1e-6);
        assert!((w.optimism - 0.30 / 1.05).abs() < 1e-6);
    }

    #[test]
    fn renormalize_keeps_zero_weights_unchanged() {
        let zero = ScoringWeights {
            optimism: 0.0,
            forward_progress: 0.0,
            credibility: 0.0,
            freshness: 0.0,
            topic_fit: 0.0,
        };
        let w = zero.renormalized();
        assert_eq!(w, zero);
        assert!(w.as_named().iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn renormalize_ignores_non_finite_total() {
        let w = ScoringWeights {
            optimism: f32::INFINITY,
            ..ScoringWeights::default()
        };
        let out = w.renormalized();
        assert_eq!(out.forward_progress, w.forward_progress);
    }

    #[test]
    fn default_ceiling_holds_for_defaults() {
        assert!(CategoryThresholds::default().max_sensationalism <= SENSATIONALISM_CEILING);
    }
}
