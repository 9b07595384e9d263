//! Candidate items and their per-pass scores.
//!
//! Candidates are owned by the caller and never mutated by the engine.
//! `ItemScores` hold the six normalized components; the `total` stored here is
//! the score under the category defaults, later passes re-rank with
//! [`ItemScores::adjusted_total`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::credibility::CredibilityTable;
use crate::params::{ScoringPenalties, ScoringWeights};

/// A content item offered to the curation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable, unique identity (survives the handoff to persistence).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub source: String,
    pub published_at: DateTime<Utc>,
    /// Externally computed credibility in [0,1].
    pub credibility: f32,
    pub category: String,
}

/// Candidate as it arrives from an upstream feed, before credibility is resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub source: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub credibility: Option<f32>,
    pub category: String,
}

impl RawCandidate {
    /// Fill a missing credibility from the table; clamp to [0,1] either way.
    pub fn into_candidate(self, table: &CredibilityTable) -> Candidate {
        let credibility = match self.credibility {
            Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
            _ => table.credibility_for(&self.source),
        };
        Candidate {
            id: self.id,
            title: self.title,
            excerpt: self.excerpt,
            source: self.source,
            published_at: self.published_at,
            credibility,
            category: self.category,
        }
    }
}

/// Normalized quality scores of one candidate, each in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemScores {
    pub optimism: f32,
    pub sensationalism: f32,
    pub forward_progress: f32,
    pub freshness: f32,
    pub credibility: f32,
    pub topic_fit: f32,
    pub total: f32,
}

impl ItemScores {
    /// Weighted sum of the components minus the sensationalism penalty, clamped.
    pub fn adjusted_total(&self, w: &ScoringWeights, p: &ScoringPenalties) -> f32 {
        let raw = self.optimism * w.optimism
            + self.forward_progress * w.forward_progress
            + self.credibility * w.credibility
            + self.freshness * w.freshness
            + self.topic_fit * w.topic_fit
            - self.sensationalism * p.sensationalism;
        raw.clamp(0.0, 1.0)
    }
}

/// A candidate paired with the scores computed for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub scores: ItemScores,
}
