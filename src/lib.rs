// src/lib.rs
// Public library surface for the demo binary and integration tests.

pub mod candidate;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod params;
pub mod text;

// Score → select → evaluate → adjust loop
pub mod refine;

pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::candidate::{Candidate, ItemScores, RawCandidate, ScoredCandidate};
pub use crate::config::{CategoryProfile, CredibilityTable, CurationConfig};
pub use crate::error::ConfigError;
pub use crate::params::{
    CategoryThresholds, LoopParams, ScoringPenalties, ScoringWeights, SENSATIONALISM_CEILING,
};
pub use crate::refine::{
    Adjustment, CategoryBatch, CurationEngine, FailureReason, LoopOutcome, LoopResult,
    MemoryPassLog, PassLog, PassLogSink, SelectedItem, SelectionMetrics,
};
