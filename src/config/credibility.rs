//! # Source credibility
//!
//! Configurable mapping from source names (e.g. "Reuters", "Nature") to a
//! credibility in `[0.0, 1.0]`, used when a feed does not supply one.
//!
//! - Loads from JSON (sources + aliases), falls back to a built-in seed.
//! - Case-insensitive lookup with normalization of punctuation and dashes.
//! - Fallback order: aliases → exact match → substring match → default.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use tracing::warn;

pub const DEFAULT_CREDIBILITY_PATH: &str = "config/credibility.json";

#[derive(Debug, Clone, Deserialize)]
pub struct CredibilityTable {
    /// Credibility if no match is found.
    #[serde(default = "default_credibility")]
    pub default_credibility: f32,
    /// Credibility per canonical source name.
    #[serde(default)]
    pub sources: HashMap<String, f32>,
    /// Alternative spellings / domains → canonical names.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_credibility() -> f32 {
    0.50
}

impl CredibilityTable {
    /// Load from a JSON file. Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str::<Self>(&s)
                .map(Self::normalized)
                .unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "invalid credibility table, using seed");
                    Self::default_seed()
                }),
            Err(_) => Self::default_seed(),
        }
    }

    /// Credibility for a given source name.
    pub fn credibility_for(&self, source: &str) -> f32 {
        let s = normalize(source);

        // 1) Alias resolution.
        if let Some(canon) = self.aliases.get(&s) {
            if let Some(&c) = self.sources.get(&normalize(canon)) {
                return clamp01(c);
            }
        }

        // 2) Exact match.
        if let Some(&c) = self.sources.get(&s) {
            return clamp01(c);
        }

        // 3) Substring fallback, longest key first so the result is stable.
        let mut keys: Vec<&String> = self.sources.keys().filter(|k| s.contains(k.as_str())).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        if let Some(k) = keys.first() {
            return clamp01(self.sources[*k]);
        }

        // 4) Default.
        clamp01(self.default_credibility)
    }

    /// Built-in seed with common wire services, outlets and journals.
    pub fn default_seed() -> Self {
        let mut sources = HashMap::new();
        let mut aliases = HashMap::new();

        for (k, v) in [
            ("reuters", 0.90),
            ("associated press", 0.90),
            ("bbc", 0.85),
            ("npr", 0.85),
            ("the guardian", 0.80),
            ("financial times", 0.85),
            ("the economist", 0.85),
            ("nature", 0.95),
            ("science", 0.95),
            ("new scientist", 0.80),
            ("ars technica", 0.80),
            ("mit technology review", 0.85),
            ("positive news", 0.70),
            ("good news network", 0.60),
            ("tabloid daily", 0.20),
        ] {
            sources.insert(k.to_string(), v);
        }

        for (a, c) in [
            ("ap", "associated press"),
            ("ap news", "associated press"),
            ("apnews com", "associated press"),
            ("bbc news", "bbc"),
            ("guardian", "the guardian"),
            ("theguardian com", "the guardian"),
            ("ft", "financial times"),
            ("economist", "the economist"),
            ("nature com", "nature"),
            ("arstechnica", "ars technica"),
            ("technology review", "mit technology review"),
        ] {
            aliases.insert(a.to_string(), c.to_string());
        }

        Self {
            default_credibility: default_credibility(),
            sources,
            aliases,
        }
    }

    /// Normalize keys loaded from disk so lookups match regardless of spelling.
    fn normalized(self) -> Self {
        Self {
            default_credibility: self.default_credibility,
            sources: self
                .sources
                .into_iter()
                .map(|(k, v)| (normalize(&k), v))
                .collect(),
            aliases: self
                .aliases
                .into_iter()
                .map(|(k, v)| (normalize(&k), normalize(&v)))
                .collect(),
        }
    }
}

/// Lowercase, turn punctuation/dashes into spaces, collapse spaces.
fn normalize(s: &str) -> String {
    let mut out = s.trim().to_lowercase();
    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }
    out = out.replace(['\n', '\r', '\t', '.', ',', '’', '\''], " ");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CredibilityTable {
        CredibilityTable::default_seed()
    }

    #[test]
    fn exact_and_case_insensitive() {
        let t = table();
        assert!((t.credibility_for("Reuters") - 0.90).abs() < 1e-6);
        assert!((t.credibility_for("REUTERS") - 0.90).abs() < 1e-6);
    }

    #[test]
    fn alias_and_domain_forms() {
        let t = table();
        assert!((t.credibility_for("AP") - 0.90).abs() < 1e-6);
        assert!((t.credibility_for("theguardian.com") - 0.80).abs() < 1e-6);
    }

    #[test]
    fn substring_match_on_embedded_name() {
        let t = table();
        // no exact entry, the canonical name is embedded in the label
        assert!((t.credibility_for("New Scientist Weekly") - 0.80).abs() < 1e-6);
    }

    #[test]
    fn unknown_source_gets_default() {
        let t = table();
        assert!((t.credibility_for("Some Blog") - t.default_credibility).abs() < 1e-6);
    }

    #[test]
    fn missing_file_falls_back_to_seed() {
        let t = CredibilityTable::load_from_file("does/not/exist.json");
        assert!((t.credibility_for("Nature") - 0.95).abs() < 1e-6);
    }
}
