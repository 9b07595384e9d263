// src/config/curation.rs
//! Category profiles and loop tuning.
//!
//! TOML shape:
//! ```toml
//! [loop]
//! max_passes = 20
//! adjustment_step = 0.05
//!
//! [defaults.weights]
//! optimism = 0.25
//! # ...
//!
//! [categories.science]
//! keywords = ["research", "study", "climate change"]
//! [categories.science.thresholds]
//! target_item_count = 8
//! ```
//! A category section overrides only the fields it names; everything else is
//! taken from `[defaults.*]` (which in turn falls back to the built-in values).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::params::{
    CategoryThresholds, LoopParams, ScoringPenalties, ScoringWeights, SENSATIONALISM_CEILING,
};

// --- env defaults & names ---
pub const DEFAULT_CURATION_CONFIG_PATH: &str = "config/curation.toml";
pub const ENV_CURATION_CONFIG_PATH: &str = "CURATION_CONFIG_PATH";
pub const ENV_MAX_PASSES: &str = "CURATION_MAX_PASSES";
pub const ENV_ADJUSTMENT_STEP: &str = "CURATION_ADJUSTMENT_STEP";

fn default_max_passes() -> u32 {
    20
}
fn default_adjustment_step() -> f32 {
    0.05
}

/// Loop-wide tuning constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopTuning {
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    #[serde(default = "default_adjustment_step")]
    pub adjustment_step: f32,
}

impl Default for LoopTuning {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
            adjustment_step: default_adjustment_step(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub penalties: ScoringPenalties,
    #[serde(default)]
    pub thresholds: CategoryThresholds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub weights: WeightOverrides,
    #[serde(default)]
    pub penalties: PenaltyOverrides,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

/// Per-category weight fields; `None` keeps the `[defaults.weights]` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightOverrides {
    pub optimism: Option<f32>,
    pub forward_progress: Option<f32>,
    pub credibility: Option<f32>,
    pub freshness: Option<f32>,
    pub topic_fit: Option<f32>,
}

impl WeightOverrides {
    pub fn over(&self, base: ScoringWeights) -> ScoringWeights {
        ScoringWeights {
            optimism: self.optimism.unwrap_or(base.optimism),
            forward_progress: self.forward_progress.unwrap_or(base.forward_progress),
            credibility: self.credibility.unwrap_or(base.credibility),
            freshness: self.freshness.unwrap_or(base.freshness),
            topic_fit: self.topic_fit.unwrap_or(base.topic_fit),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyOverrides {
    pub sensationalism: Option<f32>,
}

impl PenaltyOverrides {
    pub fn over(&self, base: ScoringPenalties) -> ScoringPenalties {
        ScoringPenalties {
            sensationalism: self.sensationalism.unwrap_or(base.sensationalism),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdOverrides {
    pub target_item_count: Option<usize>,
    pub min_item_count: Option<usize>,
    pub max_item_count: Option<usize>,
    pub max_sensationalism: Option<f32>,
    pub min_optimism: Option<f32>,
    pub min_forward_progress_pct: Option<f32>,
    pub max_same_source_items: Option<usize>,
}

impl ThresholdOverrides {
    pub fn over(&self, base: CategoryThresholds) -> CategoryThresholds {
        CategoryThresholds {
            target_item_count: self.target_item_count.unwrap_or(base.target_item_count),
            min_item_count: self.min_item_count.unwrap_or(base.min_item_count),
            max_item_count: self.max_item_count.unwrap_or(base.max_item_count),
            max_sensationalism: self.max_sensationalism.unwrap_or(base.max_sensationalism),
            min_optimism: self.min_optimism.unwrap_or(base.min_optimism),
            min_forward_progress_pct: self
                .min_forward_progress_pct
                .unwrap_or(base.min_forward_progress_pct),
            max_same_source_items: self
                .max_same_source_items
                .unwrap_or(base.max_same_source_items),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurationConfig {
    #[serde(default, rename = "loop")]
    pub tuning: LoopTuning,
    #[serde(default)]
    pub defaults: ProfileDefaults,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryConfig>,
}

/// Fully resolved starting point for one category's loop.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProfile {
    pub name: String,
    /// Lowercased keywords; a keyword may be a multi-word phrase.
    pub keywords: Vec<String>,
    pub params: LoopParams,
}

impl CurationConfig {
    /// Load from `$CURATION_CONFIG_PATH` or `config/curation.toml`, then apply
    /// env overrides for the loop tuning.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CURATION_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CURATION_CONFIG_PATH));
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading curation config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing curation config at {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// `CURATION_MAX_PASSES` / `CURATION_ADJUSTMENT_STEP`; unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(n) = parse_env::<u32>(ENV_MAX_PASSES) {
            self.tuning.max_passes = n;
        }
        if let Some(step) = parse_env::<f32>(ENV_ADJUSTMENT_STEP) {
            self.tuning.adjustment_step = step;
        }
    }

    /// Built-in configuration used when no file is available.
    pub fn default_seed() -> Self {
        let mut categories = BTreeMap::new();
        for (name, keywords) in [
            (
                "technology",
                &["software", "chip", "ai", "robot", "robotics", "battery", "internet", "app", "open source"][..],
            ),
            (
                "science",
                &["research", "researchers", "study", "scientists", "telescope", "species", "physics", "genome"][..],
            ),
            (
                "health",
                &["vaccine", "treatment", "patients", "hospital", "therapy", "disease", "clinical trial"][..],
            ),
            (
                "environment",
                &["climate", "solar", "wind", "emissions", "forest", "ocean", "renewable", "wildlife"][..],
            ),
            (
                "business",
                &["startup", "company", "market", "jobs", "economy", "investors", "trade"][..],
            ),
        ] {
            categories.insert(
                name.to_string(),
                CategoryConfig {
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                    ..CategoryConfig::default()
                },
            );
        }
        Self {
            tuning: LoopTuning::default(),
            defaults: ProfileDefaults::default(),
            categories,
        }
    }

    /// Resolve a category's starting parameters. Unknown categories get the
    /// defaults and no keywords.
    pub fn profile(&self, category: &str) -> CategoryProfile {
        let wanted = category.trim();
        let entry = self
            .categories
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(wanted));

        let d = &self.defaults;
        match entry {
            Some((name, c)) => CategoryProfile {
                name: name.clone(),
                keywords: c
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
                params: LoopParams::new(
                    c.weights.over(d.weights),
                    c.thresholds.over(d.thresholds),
                    c.penalties.over(d.penalties),
                ),
            },
            None => CategoryProfile {
                name: wanted.to_string(),
                keywords: Vec::new(),
                params: LoopParams::new(d.weights, d.thresholds, d.penalties),
            },
        }
    }

    /// Reject configurations the loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tuning.max_passes == 0 {
            return Err(ConfigError::ZeroPasses);
        }
        let step = self.tuning.adjustment_step;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::InvalidStep(step));
        }

        let d = &self.defaults;
        validate_params(
            "<defaults>",
            &LoopParams::new(d.weights, d.thresholds, d.penalties),
        )?;
        for name in self.categories.keys() {
            validate_params(name, &self.profile(name).params)?;
        }
        Ok(())
    }
}

fn validate_params(category: &str, p: &LoopParams) -> Result<(), ConfigError> {
    for (field, value) in p.weights.as_named() {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidWeight {
                category: category.to_string(),
                field,
                value,
            });
        }
    }
    let sum = p.weights.sum();
    if sum <= 0.0 {
        return Err(ConfigError::NonPositiveWeightSum {
            category: category.to_string(),
            sum,
        });
    }

    let sens = p.penalties.sensationalism;
    if !sens.is_finite() || sens < 0.0 {
        return Err(ConfigError::InvalidPenalty {
            category: category.to_string(),
            field: "sensationalism",
            value: sens,
        });
    }

    let t = &p.thresholds;
    if t.min_item_count > t.max_item_count {
        return Err(ConfigError::ItemCountRange {
            category: category.to_string(),
            min: t.min_item_count,
            max: t.max_item_count,
        });
    }
    if t.target_item_count < t.min_item_count || t.target_item_count > t.max_item_count {
        return Err(ConfigError::TargetOutOfRange {
            category: category.to_string(),
            target: t.target_item_count,
            min: t.min_item_count,
            max: t.max_item_count,
        });
    }
    if t.max_same_source_items == 0 {
        return Err(ConfigError::ZeroSourceCap {
            category: category.to_string(),
        });
    }
    for (field, value) in [
        ("max_sensationalism", t.max_sensationalism),
        ("min_optimism", t.min_optimism),
        ("min_forward_progress_pct", t.min_forward_progress_pct),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::RatioOutOfRange {
                category: category.to_string(),
                field,
                value,
            });
        }
    }
    if t.max_sensationalism > SENSATIONALISM_CEILING {
        return Err(ConfigError::SensationalismAboveCeiling {
            category: category.to_string(),
            value: t.max_sensationalism,
            ceiling: SENSATIONALISM_CEILING,
        });
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
[loop]
max_passes = 12

[defaults.thresholds]
target_item_count = 6
min_item_count = 3
max_item_count = 8

[categories.Science]
keywords = ["Research", " telescope ", ""]

[categories.science_strict.penalties]
sensationalism = 0.6
"#;

    #[test]
    fn partial_sections_fill_from_defaults() {
        let cfg = CurationConfig::from_toml_str(TEST_TOML).expect("parse");
        assert_eq!(cfg.tuning.max_passes, 12);
        assert!((cfg.tuning.adjustment_step - 0.05).abs() < 1e-6);

        let t = cfg.defaults.thresholds;
        assert_eq!((t.target_item_count, t.min_item_count, t.max_item_count), (6, 3, 8));
        assert!((t.max_sensationalism - 0.30).abs() < 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn profile_lookup_is_case_insensitive_and_cleans_keywords() {
        let cfg = CurationConfig::from_toml_str(TEST_TOML).expect("parse");
        let p = cfg.profile("science");
        assert_eq!(p.name, "Science");
        assert_eq!(p.keywords, vec!["research", "telescope"]);
        assert_eq!(p.params.thresholds.target_item_count, 6);

        let strict = cfg.profile("science_strict");
        assert!((strict.params.penalties.sensationalism - 0.6).abs() < 1e-6);
    }

    #[test]
    fn partial_category_section_merges_file_defaults() {
        let cfg = CurationConfig::from_toml_str(
            r#"
[defaults.thresholds]
target_item_count = 6
min_item_count = 4
max_item_count = 8
max_sensationalism = 0.2

[defaults.weights]
credibility = 0.4

[categories.health.thresholds]
target_item_count = 8

[categories.health.weights]
optimism = 0.1
"#,
        )
        .expect("parse");
        let t = cfg.profile("health").params.thresholds;
        assert_eq!((t.target_item_count, t.min_item_count, t.max_item_count), (8, 4, 8));
        assert!((t.max_sensationalism - 0.2).abs() < 1e-6);
        assert_eq!(t.max_same_source_items, 3);

        let w = cfg.profile("health").params.weights;
        assert!((w.optimism - 0.1).abs() < 1e-6);
        assert!((w.credibility - 0.4).abs() < 1e-6);
        assert!((w.forward_progress - 0.25).abs() < 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unknown_category_uses_defaults() {
        let cfg = CurationConfig::default_seed();
        let p = cfg.profile("gardening");
        assert!(p.keywords.is_empty());
        assert_eq!(p.params.weights, ScoringWeights::default());
    }

    #[test]
    fn seed_validates() {
        assert!(CurationConfig::default_seed().validate().is_ok());
    }

    #[test]
    fn rejects_ceiling_breach_and_bad_ranges() {
        let mut cfg = CurationConfig::default_seed();
        cfg.defaults.thresholds.max_sensationalism = 0.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SensationalismAboveCeiling { .. })
        ));

        let mut cfg = CurationConfig::default_seed();
        cfg.defaults.thresholds.min_item_count = 20;
        assert!(matches!(cfg.validate(), Err(ConfigError::ItemCountRange { .. })));

        let mut cfg = CurationConfig::default_seed();
        cfg.defaults.thresholds.target_item_count = 2;
        assert!(matches!(cfg.validate(), Err(ConfigError::TargetOutOfRange { .. })));

        let mut cfg = CurationConfig::default_seed();
        cfg.defaults.weights = ScoringWeights {
            optimism: 0.0,
            forward_progress: 0.0,
            credibility: 0.0,
            freshness: 0.0,
            topic_fit: 0.0,
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveWeightSum { .. })));

        let mut cfg = CurationConfig::default_seed();
        cfg.tuning.adjustment_step = f32::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStep(_))));
    }

    #[test]
    fn category_override_is_validated_too() {
        let toml = r#"
[categories.world.thresholds]
max_same_source_items = 0
"#;
        let cfg = CurationConfig::from_toml_str(toml).expect("parse");
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroSourceCap {
                category: "world".into()
            })
        );
    }
}
