//! Acceptance check of a selection against category thresholds.
//!
//! Emits structured `FailureReason`s that the adjustor consumes directly; the
//! `Display` text is for humans only.

use serde::Serialize;
use std::fmt;

use super::aggregate::SelectionMetrics;
use crate::params::CategoryThresholds;

/// Why a selection was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    TooFewItems { count: usize, min: usize },
    TooSensational { avg: f32, max: f32 },
    LowForwardProgress { pct: f32, min: f32 },
    LowOptimism { avg: f32, min: f32 },
    /// Everything from one outlet. Blocks acceptance like the hard checks.
    SingleSource { source: String, count: usize },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::TooFewItems { count, min } => {
                write!(f, "Item count {count} below minimum {min}")
            }
            FailureReason::TooSensational { avg, max } => {
                write!(f, "Avg sensationalism {avg:.2} exceeds max {max:.2}")
            }
            FailureReason::LowForwardProgress { pct, min } => write!(
                f,
                "Forward progress {:.0}% below minimum {:.0}%",
                pct * 100.0,
                min * 100.0
            ),
            FailureReason::LowOptimism { avg, min } => {
                write!(f, "Avg optimism {avg:.2} below minimum {min:.2}")
            }
            FailureReason::SingleSource { source, count } => {
                write!(f, "All {count} items come from a single source ({source})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub accepted: bool,
    pub failure_reasons: Vec<FailureReason>,
}

/// Run every check in fixed order; none short-circuits.
pub fn evaluate(metrics: &SelectionMetrics, t: &CategoryThresholds) -> Evaluation {
    let mut reasons = Vec::new();

    if metrics.item_count < t.min_item_count {
        reasons.push(FailureReason::TooFewItems {
            count: metrics.item_count,
            min: t.min_item_count,
        });
    }
    if metrics.avg_sensationalism > t.max_sensationalism {
        reasons.push(FailureReason::TooSensational {
            avg: metrics.avg_sensationalism,
            max: t.max_sensationalism,
        });
    }
    if metrics.forward_progress_pct < t.min_forward_progress_pct {
        reasons.push(FailureReason::LowForwardProgress {
            pct: metrics.forward_progress_pct,
            min: t.min_forward_progress_pct,
        });
    }
    if metrics.avg_optimism < t.min_optimism {
        reasons.push(FailureReason::LowOptimism {
            avg: metrics.avg_optimism,
            min: t.min_optimism,
        });
    }
    if metrics.source_diversity == 1 && metrics.item_count > 2 {
        reasons.push(FailureReason::SingleSource {
            source: metrics.sources.first().cloned().unwrap_or_default(),
            count: metrics.item_count,
        });
    }

    Evaluation {
        accepted: reasons.is_empty(),
        failure_reasons: reasons,
    }
}
