// src/refine/mod.rs
//! Refinement loop entry: drives Select → Measure → Evaluate → Adjust until a
//! selection is accepted or the pass budget runs out.
//!
//! Order per pass:
//! 1) select with the current parameter snapshot
//! 2) aggregate metrics, evaluate against thresholds, log the pass
//! 3) accepted → return immediately
//! 4) otherwise remember the least sensational selection so far, let the
//!    adjustor derive the next snapshot, renormalize weights
//!
//! When the budget is spent the least-bad selection ever seen is returned, not
//! the last one attempted.

pub mod acceptance;
pub mod adjustor;
pub mod aggregate;
pub mod pass_log;
pub mod scorer;
pub mod selector;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::candidate::{Candidate, ScoredCandidate};
use crate::config::{CategoryProfile, CurationConfig};
use crate::error::ConfigError;
use crate::params::LoopParams;
use crate::telemetry::ensure_metrics_described;

// Re-export convenient types.
pub use acceptance::{evaluate, Evaluation, FailureReason};
pub use adjustor::{AdjustOutcome, Adjustment, AdjustmentKind, Adjustor, ParamField};
pub use aggregate::{aggregate, SelectionMetrics};
pub use pass_log::{MemoryPassLog, NoopPassLog, PassLog, PassLogSink, TracingPassLog};
pub use scorer::{score, score_candidates};
pub use selector::{select, SelectedItem};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopOutcome {
    Accepted,
    Exhausted,
    DeadlineReached,
}

/// Terminal output of one refinement run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopResult {
    pub category: String,
    pub accepted: bool,
    pub outcome: LoopOutcome,
    /// Pass that produced `selected_items`.
    pub pass_number: u32,
    /// Passes actually executed.
    pub passes_run: u32,
    pub metrics: SelectionMetrics,
    /// Every nudge applied during the run, in order.
    pub adjustments: Vec<Adjustment>,
    pub failure_reasons: Vec<FailureReason>,
    pub selected_items: Vec<SelectedItem>,
}

/// Candidates of one category for [`CurationEngine::run_categories`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBatch {
    pub category: String,
    pub candidates: Vec<Candidate>,
}

impl CategoryBatch {
    /// Group a mixed pool by `Candidate::category`, sorted by category name.
    pub fn group(candidates: Vec<Candidate>) -> Vec<CategoryBatch> {
        let mut by_cat: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();
        for c in candidates {
            by_cat.entry(c.category.clone()).or_default().push(c);
        }
        by_cat
            .into_iter()
            .map(|(category, candidates)| CategoryBatch {
                category,
                candidates,
            })
            .collect()
    }
}

/// Best failing pass seen so far.
struct PassSnapshot {
    pass_number: u32,
    metrics: SelectionMetrics,
    failure_reasons: Vec<FailureReason>,
    selection: Vec<SelectedItem>,
}

/// Validated configuration plus the audit sink. Holds no per-run state, so
/// one engine can serve any number of runs, concurrently.
pub struct CurationEngine {
    config: CurationConfig,
    adjustor: Adjustor,
    sink: Arc<dyn PassLogSink>,
}

impl CurationEngine {
    /// Validate the configuration up front; malformed profiles never reach a pass.
    pub fn new(config: CurationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        ensure_metrics_described();
        Ok(Self {
            adjustor: Adjustor::new(config.tuning.adjustment_step),
            config,
            sink: Arc::new(TracingPassLog),
        })
    }

    /// Replace the pass log sink.
    pub fn with_sink(mut self, sink: Arc<dyn PassLogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    pub fn profile(&self, category: &str) -> CategoryProfile {
        self.config.profile(category)
    }

    /// Score a pool once, e.g. to reuse it across several runs.
    pub fn score_candidates(
        &self,
        category: &str,
        candidates: &[Candidate],
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate> {
        score_candidates(&self.profile(category), candidates, now)
    }

    pub fn run_refinement_loop(
        &self,
        category: &str,
        candidates: &[Candidate],
        now: DateTime<Utc>,
    ) -> LoopResult {
        let profile = self.profile(category);
        let pool = score_candidates(&profile, candidates, now);
        self.drive(&profile, &pool, None)
    }

    /// Like [`Self::run_refinement_loop`], but stops between passes once
    /// `deadline` has passed. The first pass always runs.
    pub fn run_refinement_loop_with_deadline(
        &self,
        category: &str,
        candidates: &[Candidate],
        now: DateTime<Utc>,
        deadline: Instant,
    ) -> LoopResult {
        let profile = self.profile(category);
        let pool = score_candidates(&profile, candidates, now);
        self.drive(&profile, &pool, Some(deadline))
    }

    /// Run on a pool whose scores were computed earlier.
    pub fn run_refinement_loop_scored(&self, category: &str, pool: &[ScoredCandidate]) -> LoopResult {
        self.drive(&self.profile(category), pool, None)
    }

    /// Independent categories in parallel; results come back in batch order.
    pub fn run_categories(&self, batches: &[CategoryBatch], now: DateTime<Utc>) -> Vec<LoopResult> {
        std::thread::scope(|s| {
            let handles: Vec<_> = batches
                .iter()
                .map(|b| s.spawn(move || self.run_refinement_loop(&b.category, &b.candidates, now)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    fn drive(
        &self,
        profile: &CategoryProfile,
        pool: &[ScoredCandidate],
        deadline: Option<Instant>,
    ) -> LoopResult {
        let category = profile.name.as_str();
        let max_passes = self.config.tuning.max_passes;

        let mut params: LoopParams = profile.params.with_renormalized_weights();
        let mut applied: Vec<Adjustment> = Vec::new();
        let mut best: Option<PassSnapshot> = None;
        let mut passes_run = 0u32;
        let mut outcome = LoopOutcome::Exhausted;

        for pass in 1..=max_passes {
            if pass > 1 && deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(target: "refine", category, pass, "deadline reached, returning best so far");
                outcome = LoopOutcome::DeadlineReached;
                break;
            }
            passes_run = pass;

            // Selecting
            let selection = select(pool, &params);

            // Evaluating
            let metrics = aggregate(&selection);
            let eval = evaluate(&metrics, &params.thresholds);
            self.sink.record(PassLog {
                category: category.to_string(),
                pass_number: pass,
                metrics: metrics.clone(),
                thresholds: params.thresholds,
                weights: params.weights,
                penalties: params.penalties,
                accepted: eval.accepted,
                failure_reasons: eval.failure_reasons.clone(),
                selection_digest: pass_log::selection_digest(&selection),
            });
            counter!("curation_passes_total").increment(1);
            debug!(
                target: "refine",
                category,
                pass,
                items = metrics.item_count,
                accepted = eval.accepted,
                reasons = eval.failure_reasons.len(),
                "pass evaluated"
            );

            if eval.accepted {
                info!(target: "refine", category, pass, items = metrics.item_count, "selection accepted");
                return finish(
                    category,
                    LoopOutcome::Accepted,
                    passes_run,
                    applied,
                    PassSnapshot {
                        pass_number: pass,
                        metrics,
                        failure_reasons: Vec::new(),
                        selection,
                    },
                );
            }

            // Least sensational wins; the earlier pass keeps ties.
            let improves = best
                .as_ref()
                .map_or(true, |b| metrics.avg_sensationalism < b.metrics.avg_sensationalism);
            let failure_reasons = eval.failure_reasons;

            // Adjusting
            let out = self.adjustor.adjust(&params, &failure_reasons, pass);
            counter!("curation_adjustments_total").increment(out.adjustments.len() as u64);
            applied.extend(out.adjustments);
            params = out.params.with_renormalized_weights();

            if improves {
                best = Some(PassSnapshot {
                    pass_number: pass,
                    metrics,
                    failure_reasons,
                    selection,
                });
            }
        }

        let best = best.unwrap_or_else(|| PassSnapshot {
            pass_number: 0,
            metrics: SelectionMetrics::default(),
            failure_reasons: Vec::new(),
            selection: Vec::new(),
        });
        info!(
            target: "refine",
            category,
            passes = passes_run,
            best_pass = best.pass_number,
            items = best.metrics.item_count,
            "no acceptable selection, returning least sensational"
        );
        finish(category, outcome, passes_run, applied, best)
    }
}

fn finish(
    category: &str,
    outcome: LoopOutcome,
    passes_run: u32,
    adjustments: Vec<Adjustment>,
    snap: PassSnapshot,
) -> LoopResult {
    let label = match outcome {
        LoopOutcome::Accepted => "accepted",
        LoopOutcome::Exhausted => "exhausted",
        LoopOutcome::DeadlineReached => "deadline",
    };
    counter!("curation_runs_total", "outcome" => label).increment(1);
    histogram!("curation_passes_per_run").record(passes_run as f64);

    LoopResult {
        category: category.to_string(),
        accepted: outcome == LoopOutcome::Accepted,
        outcome,
        pass_number: snap.pass_number,
        passes_run,
        metrics: snap.metrics,
        adjustments,
        failure_reasons: snap.failure_reasons,
        selected_items: snap.selection,
    }
}
