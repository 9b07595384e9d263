//! Init-time configuration errors.
//!
//! These are precondition violations: a category profile or loop tuning that
//! the refinement loop cannot run with. They are reported before any pass runs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("category `{category}`: weight `{field}` must be finite and non-negative (got {value})")]
    InvalidWeight {
        category: String,
        field: &'static str,
        value: f32,
    },
    #[error("category `{category}`: weights must sum to a positive value (got {sum})")]
    NonPositiveWeightSum { category: String, sum: f32 },
    #[error("category `{category}`: penalty `{field}` must be finite and non-negative (got {value})")]
    InvalidPenalty {
        category: String,
        field: &'static str,
        value: f32,
    },
    #[error("category `{category}`: min_item_count {min} exceeds max_item_count {max}")]
    ItemCountRange {
        category: String,
        min: usize,
        max: usize,
    },
    #[error(
        "category `{category}`: target_item_count {target} is outside [{min}, {max}]"
    )]
    TargetOutOfRange {
        category: String,
        target: usize,
        min: usize,
        max: usize,
    },
    #[error("category `{category}`: max_same_source_items must be at least 1")]
    ZeroSourceCap { category: String },
    #[error("category `{category}`: `{field}` must lie in [0, 1] (got {value})")]
    RatioOutOfRange {
        category: String,
        field: &'static str,
        value: f32,
    },
    #[error(
        "category `{category}`: max_sensationalism {value} exceeds the absolute ceiling {ceiling}"
    )]
    SensationalismAboveCeiling {
        category: String,
        value: f32,
        ceiling: f32,
    },
    #[error("max_passes must be at least 1")]
    ZeroPasses,
    #[error("adjustment_step must be finite and positive (got {0})")]
    InvalidStep(f32),
}
