// tests/common/mod.rs
// Shared builders for integration tests.
#![allow(dead_code)]

use calm_curator::{Candidate, CurationConfig, ItemScores, ScoredCandidate};
use chrono::{DateTime, TimeZone, Utc};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn candidate(id: &str, source: &str, title: &str, hours_old: i64) -> Candidate {
    Candidate {
        id: id.into(),
        title: title.into(),
        excerpt: None,
        source: source.into(),
        published_at: fixed_now() - chrono::Duration::hours(hours_old),
        credibility: 0.8,
        category: "science".into(),
    }
}

/// Pre-scored item with healthy optimism / progress and the given sensationalism.
pub fn scored(id: &str, source: &str, sensationalism: f32) -> ScoredCandidate {
    ScoredCandidate {
        candidate: candidate(id, source, id, 1),
        scores: ItemScores {
            optimism: 0.75,
            sensationalism,
            forward_progress: 0.67,
            freshness: 0.9,
            credibility: 0.8,
            topic_fit: 0.5,
            total: 0.6,
        },
    }
}

/// Built-in config with a small, explicit pass budget.
pub fn config_with(min_items: usize, target: usize) -> CurationConfig {
    let mut cfg = CurationConfig::default_seed();
    cfg.tuning.max_passes = 20;
    cfg.tuning.adjustment_step = 0.05;
    cfg.defaults.thresholds.min_item_count = min_items;
    cfg.defaults.thresholds.target_item_count = target;
    cfg
}
