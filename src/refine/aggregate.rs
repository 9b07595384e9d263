//! Aggregate statistics of a selection.

use serde::Serialize;
use std::collections::BTreeSet;

use super::selector::SelectedItem;

/// An item counts as forward progress from this score up.
pub const FORWARD_PROGRESS_ITEM_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionMetrics {
    pub avg_sensationalism: f32,
    pub avg_optimism: f32,
    /// Fraction of items with `forward_progress >= 0.5` (binary per item).
    pub forward_progress_pct: f32,
    pub item_count: usize,
    pub source_diversity: usize,
    /// Distinct source names, sorted.
    pub sources: Vec<String>,
}

pub fn aggregate(selection: &[SelectedItem]) -> SelectionMetrics {
    if selection.is_empty() {
        return SelectionMetrics::default();
    }
    let n = selection.len() as f32;

    let (sens, opt, progressed) =
        selection
            .iter()
            .fold((0.0f32, 0.0f32, 0usize), |(s, o, p), it| {
                let hit = usize::from(it.scores.forward_progress >= FORWARD_PROGRESS_ITEM_THRESHOLD);
                (s + it.scores.sensationalism, o + it.scores.optimism, p + hit)
            });

    let sources: BTreeSet<&str> = selection
        .iter()
        .map(|it| it.candidate.source.as_str())
        .collect();

    SelectionMetrics {
        avg_sensationalism: sens / n,
        avg_optimism: opt / n,
        forward_progress_pct: progressed as f32 / n,
        item_count: selection.len(),
        source_diversity: sources.len(),
        sources: sources.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Candidate, ItemScores};
    use chrono::{TimeZone, Utc};

    fn item(source: &str, sens: f32, opt: f32, fp: f32) -> SelectedItem {
        SelectedItem {
            candidate: Candidate {
                id: format!("{source}-{sens}"),
                title: String::new(),
                excerpt: None,
                source: source.into(),
                published_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                credibility: 0.5,
                category: "x".into(),
            },
            scores: ItemScores {
                optimism: opt,
                sensationalism: sens,
                forward_progress: fp,
                freshness: 1.0,
                credibility: 0.5,
                topic_fit: 0.5,
                total: 0.5,
            },
            adjusted_score: 0.5,
        }
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let m = aggregate(&[]);
        assert_eq!(m, SelectionMetrics::default());
        assert_eq!(m.source_diversity, 0);
    }

    #[test]
    fn averages_and_binary_progress() {
        let sel = vec![
            item("A", 0.2, 0.4, 0.5),
            item("B", 0.0, 0.8, 0.49),
            item("A", 0.1, 0.6, 1.0),
            item("C", 0.1, 0.2, 0.0),
        ];
        let m = aggregate(&sel);
        assert_eq!(m.item_count, 4);
        assert!((m.avg_sensationalism - 0.1).abs() < 1e-6);
        assert!((m.avg_optimism - 0.5).abs() < 1e-6);
        // 0.49 does not count, only 0.5 and 1.0
        assert!((m.forward_progress_pct - 0.5).abs() < 1e-6);
        assert_eq!(m.source_diversity, 3);
        assert_eq!(m.sources, vec!["A", "B", "C"]);
    }
}
