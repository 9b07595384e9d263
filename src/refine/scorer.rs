//! Heuristic item scoring.
//!
//! Pure and deterministic: the same candidate, parameters and `now` always
//! yield the same `ItemScores`. Every component is normalized into [0,1].
//!
//! - sensationalism  : (lexicon hits + 0.5 per shouting word + 0.3 per `!`) / 5
//! - optimism        : optimism-lexicon hits / 4
//! - forward_progress: progress-lexicon hits / 3
//! - freshness       : exp(-age_hours / 17.3), a ~12h half-life
//! - topic_fit       : category keyword hits / 3 (0.5 without keywords)
//! - credibility     : copied from the candidate

use chrono::{DateTime, Utc};

use crate::candidate::{Candidate, ItemScores, ScoredCandidate};
use crate::config::CategoryProfile;
use crate::lexicon::Lexicon;
use crate::params::{ScoringPenalties, ScoringWeights};
use crate::text::{is_shouting, normalize_text, words};

const SENSATIONAL_DIVISOR: f32 = 5.0;
const SHOUTING_WEIGHT: f32 = 0.5;
const EXCLAMATION_WEIGHT: f32 = 0.3;
const OPTIMISM_DIVISOR: f32 = 4.0;
const FORWARD_PROGRESS_DIVISOR: f32 = 3.0;
const TOPIC_DIVISOR: f32 = 3.0;
const NEUTRAL_TOPIC_FIT: f32 = 0.5;
const FRESHNESS_DECAY_HOURS: f32 = 17.3;

/// Score one candidate under the given parameters.
pub fn score(
    candidate: &Candidate,
    weights: &ScoringWeights,
    penalties: &ScoringPenalties,
    keywords: &[String],
    now: DateTime<Utc>,
) -> ItemScores {
    let text = normalize_text(&format!(
        "{} {}",
        candidate.title,
        candidate.excerpt.as_deref().unwrap_or("")
    ));
    let raw_words = words(&text);
    let lowered: Vec<String> = raw_words.iter().map(|w| w.to_lowercase()).collect();
    let lowered_refs = || lowered.iter().map(String::as_str);

    let shouting = raw_words.iter().filter(|w| is_shouting(w)).count() as f32;
    let exclamations = text.matches('!').count() as f32;
    let sensational_raw = Lexicon::Sensational.hits(lowered_refs()) as f32
        + SHOUTING_WEIGHT * shouting
        + EXCLAMATION_WEIGHT * exclamations;

    let mut scores = ItemScores {
        optimism: clamp01(Lexicon::Optimism.hits(lowered_refs()) as f32 / OPTIMISM_DIVISOR),
        sensationalism: clamp01(sensational_raw / SENSATIONAL_DIVISOR),
        forward_progress: clamp01(
            Lexicon::ForwardProgress.hits(lowered_refs()) as f32 / FORWARD_PROGRESS_DIVISOR,
        ),
        freshness: freshness(candidate.published_at, now),
        credibility: clamp01(candidate.credibility),
        topic_fit: topic_fit(&lowered, keywords),
        total: 0.0,
    };
    scores.total = scores.adjusted_total(weights, penalties);
    scores
}

/// Score a whole pool with the profile's starting parameters.
pub fn score_candidates(
    profile: &CategoryProfile,
    candidates: &[Candidate],
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    let params = profile.params.with_renormalized_weights();
    candidates
        .iter()
        .map(|c| ScoredCandidate {
            candidate: c.clone(),
            scores: score(c, &params.weights, &params.penalties, &profile.keywords, now),
        })
        .collect()
}

fn freshness(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let age_hours = (now - published_at).num_milliseconds() as f32 / 3_600_000.0;
    clamp01((-age_hours / FRESHNESS_DECAY_HOURS).exp())
}

/// Keyword (or keyword phrase) occurrences over the lowered token stream.
fn topic_fit(lowered: &[String], keywords: &[String]) -> f32 {
    if keywords.is_empty() {
        return NEUTRAL_TOPIC_FIT;
    }
    let hits: usize = keywords
        .iter()
        .map(|k| {
            let phrase: Vec<String> = words(k).iter().map(|w| w.to_lowercase()).collect();
            if phrase.is_empty() || phrase.len() > lowered.len() {
                return 0;
            }
            lowered
                .windows(phrase.len())
                .filter(|win| *win == phrase.as_slice())
                .count()
        })
        .sum();
    clamp01(hits as f32 / TOPIC_DIVISOR)
}

fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
