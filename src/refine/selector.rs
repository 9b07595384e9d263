//! Constrained greedy selection.
//!
//! 1. Hard pre-filter: drop items above `max_sensationalism` or below half the
//!    optimism floor (looser than acceptance, so later passes keep a wide pool).
//! 2. Re-rank survivors by their total under the *current* weights/penalties.
//! 3. Ties: original total, then most recent, then id.
//! 4. Take greedily, honoring the per-source cap, up to `target_item_count`.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::candidate::{Candidate, ItemScores, ScoredCandidate};
use crate::params::LoopParams;

/// Optimism pre-filter is this fraction of the acceptance floor.
const OPTIMISM_PREFILTER_FACTOR: f32 = 0.5;

/// One picked item, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedItem {
    pub candidate: Candidate,
    pub scores: ItemScores,
    /// Total under the parameters of the pass that picked it.
    pub adjusted_score: f32,
}

pub fn select(pool: &[ScoredCandidate], params: &LoopParams) -> Vec<SelectedItem> {
    let t = &params.thresholds;
    let optimism_floor = t.min_optimism * OPTIMISM_PREFILTER_FACTOR;

    let mut ranked: Vec<(f32, &ScoredCandidate)> = pool
        .iter()
        .filter(|sc| {
            sc.scores.sensationalism <= t.max_sensationalism
                && sc.scores.optimism >= optimism_floor
        })
        .map(|sc| {
            (
                sc.scores.adjusted_total(&params.weights, &params.penalties),
                sc,
            )
        })
        .collect();

    ranked.sort_by(|(a_adj, a), (b_adj, b)| {
        desc(*a_adj, *b_adj)
            .then_with(|| desc(a.scores.total, b.scores.total))
            .then_with(|| b.candidate.published_at.cmp(&a.candidate.published_at))
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    let mut per_source: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(t.target_item_count.min(ranked.len()));
    for (adjusted, sc) in ranked {
        if out.len() >= t.target_item_count {
            break;
        }
        let count = per_source.entry(sc.candidate.source.as_str()).or_insert(0);
        if *count >= t.max_same_source_items {
            continue;
        }
        *count += 1;
        out.push(SelectedItem {
            candidate: sc.candidate.clone(),
            scores: sc.scores,
            adjusted_score: adjusted,
        });
    }
    out
}

fn desc(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
