//! Demo: curate a JSON file of candidates and print one result per category.
//!
//! Usage: `curate_demo [candidates.json]` (defaults to `demos/candidates.json`).

use anyhow::Context;
use chrono::Utc;
use std::path::PathBuf;
use tracing::warn;

use calm_curator::candidate::RawCandidate;
use calm_curator::config::credibility::DEFAULT_CREDIBILITY_PATH;
use calm_curator::telemetry::enable_dev_tracing;
use calm_curator::{CategoryBatch, CredibilityTable, CurationConfig, CurationEngine};

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; CURATION_* overrides may live there.
    let _ = dotenvy::dotenv();
    enable_dev_tracing();

    let config = CurationConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "curation config unavailable, using built-in seed");
        let mut cfg = CurationConfig::default_seed();
        cfg.apply_env_overrides();
        cfg
    });
    let credibility = CredibilityTable::load_from_file(DEFAULT_CREDIBILITY_PATH);
    let engine = CurationEngine::new(config)?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demos/candidates.json"));
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading candidates from {}", path.display()))?;
    let raw: Vec<RawCandidate> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing candidates in {}", path.display()))?;

    let candidates = raw
        .into_iter()
        .map(|r| r.into_candidate(&credibility))
        .collect();
    let batches = CategoryBatch::group(candidates);
    let results = engine.run_categories(&batches, Utc::now());

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
