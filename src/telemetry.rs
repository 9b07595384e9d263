//! Metric descriptions and the dev tracing subscriber.

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "CURATOR_DEV_LOG";
pub const ENV_CURATOR_ENV: &str = "CURATOR_ENV";

/// One-time metrics registration (so series carry help text once a recorder exists).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("curation_passes_total", "Refinement passes executed.");
        describe_counter!(
            "curation_runs_total",
            "Refinement runs finished, labelled by outcome."
        );
        describe_counter!(
            "curation_adjustments_total",
            "Parameter nudges applied by the adjustor."
        );
        describe_histogram!("curation_passes_per_run", "Passes executed per run.");
    });
}

/// Compact tracing logs for local runs.
/// Activation requires BOTH:
///   - dev environment (debug build OR CURATOR_ENV in {local, development, dev})
///   - CURATOR_DEV_LOG=1
pub fn enable_dev_tracing() {
    let dev_flag = std::env::var(ENV_DEV_LOG).ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var(ENV_CURATOR_ENV)
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("refine=debug,warn"));

    // A subscriber may already be installed (tests, embedding apps).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
