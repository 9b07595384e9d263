//! Configuration: category profiles, loop tuning, source credibility.

pub mod credibility;
pub mod curation;

pub use credibility::CredibilityTable;
pub use curation::{
    CategoryConfig, CategoryProfile, CurationConfig, LoopTuning, PenaltyOverrides,
    ThresholdOverrides, WeightOverrides,
};
