//! Failure-driven parameter nudges.
//!
//! Every matching failure reason fires its own rule in the same pass:
//!
//! | failure            | nudge                                             |
//! |--------------------|---------------------------------------------------|
//! | too sensational    | `penalties.sensationalism += step` (cap 1.0)      |
//! | low progress       | `weights.forward_progress += step` (cap 0.5)      |
//! | low optimism       | `weights.optimism += step` (cap 0.5); after pass 10 also `min_optimism -= step/2` (floor 0.2) |
//! | single source      | `weights.credibility += step` (cap 0.4)           |
//! | too few items      | `max_sensationalism += step/2`, never above [`SENSATIONALISM_CEILING`] |
//! | nothing, pass > 5  | `weights.freshness += step` (cap 0.3)             |
//!
//! The adjustor works on a copy and returns the next snapshot plus the audit
//! trail. Weight renormalization is the controller's job.

use serde::Serialize;

use super::acceptance::FailureReason;
use crate::params::{LoopParams, SENSATIONALISM_CEILING};

const SENSATIONALISM_PENALTY_CAP: f32 = 1.0;
const FORWARD_PROGRESS_WEIGHT_CAP: f32 = 0.5;
const OPTIMISM_WEIGHT_CAP: f32 = 0.5;
const CREDIBILITY_WEIGHT_CAP: f32 = 0.4;
const FRESHNESS_WEIGHT_CAP: f32 = 0.3;
const MIN_OPTIMISM_FLOOR: f32 = 0.2;
/// Relaxing the optimism floor only starts after this many passes.
const OPTIMISM_RELAX_AFTER_PASS: u32 = 10;
/// The generic fallback only starts after this many passes.
const FALLBACK_AFTER_PASS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Weight,
    Threshold,
    Penalty,
}

/// Which parameter an adjustment touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    SensationalismPenalty,
    ForwardProgressWeight,
    OptimismWeight,
    CredibilityWeight,
    FreshnessWeight,
    MinOptimism,
    MaxSensationalism,
}

/// Audit record of one applied nudge. Never read back by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub pass_number: u32,
    pub kind: AdjustmentKind,
    pub field: ParamField,
    pub old_value: f32,
    pub new_value: f32,
    pub reason: String,
}

/// Next parameter snapshot and the nudges that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustOutcome {
    pub params: LoopParams,
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustor {
    step: f32,
}

impl Default for Adjustor {
    fn default() -> Self {
        Self { step: 0.05 }
    }
}

impl Adjustor {
    pub fn new(step: f32) -> Self {
        Self { step }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn adjust(
        &self,
        params: &LoopParams,
        failures: &[FailureReason],
        pass_number: u32,
    ) -> AdjustOutcome {
        let mut next = *params;
        let mut log = AuditLog {
            pass_number,
            entries: Vec::new(),
        };
        let step = self.step;
        let mut matched = false;

        for failure in failures {
            matched = true;
            match failure {
                FailureReason::TooSensational { avg, max } => {
                    let p = &mut next.penalties.sensationalism;
                    let new = raise_capped(*p, step, SENSATIONALISM_PENALTY_CAP);
                    log.record(
                        AdjustmentKind::Penalty,
                        ParamField::SensationalismPenalty,
                        p,
                        new,
                        format!("avg sensationalism {avg:.2} > {max:.2}: penalize harder"),
                    );
                }
                FailureReason::LowForwardProgress { pct, min } => {
                    let w = &mut next.weights.forward_progress;
                    let new = raise_capped(*w, step, FORWARD_PROGRESS_WEIGHT_CAP);
                    log.record(
                        AdjustmentKind::Weight,
                        ParamField::ForwardProgressWeight,
                        w,
                        new,
                        format!("forward progress {pct:.2} < {min:.2}: favor progress stories"),
                    );
                }
                FailureReason::LowOptimism { avg, min } => {
                    let w = &mut next.weights.optimism;
                    let new = raise_capped(*w, step, OPTIMISM_WEIGHT_CAP);
                    log.record(
                        AdjustmentKind::Weight,
                        ParamField::OptimismWeight,
                        w,
                        new,
                        format!("avg optimism {avg:.2} < {min:.2}: favor optimistic stories"),
                    );
                    if pass_number > OPTIMISM_RELAX_AFTER_PASS {
                        let t = &mut next.thresholds.min_optimism;
                        let new = lower_floored(*t, step / 2.0, MIN_OPTIMISM_FLOOR);
                        log.record(
                            AdjustmentKind::Threshold,
                            ParamField::MinOptimism,
                            t,
                            new,
                            format!("optimism still short after pass {OPTIMISM_RELAX_AFTER_PASS}: relax floor"),
                        );
                    }
                }
                FailureReason::SingleSource { source, .. } => {
                    let w = &mut next.weights.credibility;
                    let new = raise_capped(*w, step, CREDIBILITY_WEIGHT_CAP);
                    log.record(
                        AdjustmentKind::Weight,
                        ParamField::CredibilityWeight,
                        w,
                        new,
                        format!("selection dominated by {source}: lean on credibility"),
                    );
                }
                FailureReason::TooFewItems { count, min } => {
                    let t = &mut next.thresholds.max_sensationalism;
                    // Hard ceiling, regardless of what the category configured.
                    let new = (*t + step / 2.0).min(SENSATIONALISM_CEILING);
                    log.record(
                        AdjustmentKind::Threshold,
                        ParamField::MaxSensationalism,
                        t,
                        new,
                        format!("only {count} of {min} items: widen sensationalism filter"),
                    );
                }
            }
        }

        if !matched && pass_number > FALLBACK_AFTER_PASS {
            let w = &mut next.weights.freshness;
            let new = raise_capped(*w, step, FRESHNESS_WEIGHT_CAP);
            log.record(
                AdjustmentKind::Weight,
                ParamField::FreshnessWeight,
                w,
                new,
                "no specific failure: favor fresher items".to_string(),
            );
        }

        AdjustOutcome {
            params: next,
            adjustments: log.entries,
        }
    }
}

struct AuditLog {
    pass_number: u32,
    entries: Vec<Adjustment>,
}

impl AuditLog {
    /// Write `new` into `slot` and keep a record, unless nothing changes.
    fn record(
        &mut self,
        kind: AdjustmentKind,
        field: ParamField,
        slot: &mut f32,
        new: f32,
        reason: String,
    ) {
        let old = *slot;
        if new == old {
            return;
        }
        *slot = new;
        self.entries.push(Adjustment {
            pass_number: self.pass_number,
            kind,
            field,
            old_value: old,
            new_value: new,
            reason,
        });
    }
}

/// Raise by `step` up to `cap`; a value already above the cap is left alone.
fn raise_capped(old: f32, step: f32, cap: f32) -> f32 {
    (old + step).min(cap).max(old)
}

/// Lower by `step` down to `floor`; a value already below the floor is left alone.
fn lower_floored(old: f32, step: f32, floor: f32) -> f32 {
    (old - step).max(floor).min(old)
}
