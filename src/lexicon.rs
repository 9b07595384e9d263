//! Fixed word lists used by the scorer.
//!
//! Matching is case-insensitive on whole word tokens; every occurrence counts.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const SENSATIONAL: &[&str] = &[
    "shocking", "shock", "shocked", "outrage", "outraged", "outrageous", "slams", "slammed",
    "chaos", "chaotic", "crisis", "disaster", "disastrous", "horrifying", "horror", "terrifying",
    "terror", "explosive", "bombshell", "devastating", "devastated", "panic", "catastrophe",
    "catastrophic", "furious", "fury", "scandal", "brutal", "nightmare", "meltdown", "doom",
    "doomed", "deadly", "insane", "unbelievable", "breaking", "exposed", "destroys", "destroyed",
    "collapse", "collapses", "plunge", "plunges", "frenzy", "rampage", "carnage", "apocalypse",
    "mayhem", "savage", "slaughter",
];

const OPTIMISM: &[&str] = &[
    "hope", "hopeful", "optimistic", "optimism", "improve", "improves", "improved", "improving",
    "improvement", "success", "successful", "succeeds", "growth", "grows", "recovery", "recover",
    "recovers", "recovering", "thrive", "thrives", "thriving", "celebrate", "celebrates",
    "win", "wins", "milestone", "gains", "boost", "boosts", "positive", "better", "solution",
    "solutions", "helps", "help", "benefit", "benefits", "record", "rise", "rises", "restored",
    "saves", "saved", "healthy", "together", "welcome", "welcomes", "bright", "achieve",
    "achieves", "achievement",
];

const FORWARD_PROGRESS: &[&str] = &[
    "breakthrough", "launch", "launches", "launched", "develop", "develops", "developed",
    "developing", "innovation", "innovative", "build", "builds", "building", "advance",
    "advances", "advancing", "progress", "pioneering", "pioneer", "expands", "expansion",
    "initiative", "invest", "invests", "investment", "future", "discovery", "discovers",
    "discovered", "reform", "reforms", "upgrade", "upgrades", "unveil", "unveils", "unveiled",
    "first", "prototype", "pilot", "roadmap", "deploy", "deploys", "deployed", "scale",
    "scaling", "opens", "opened", "new",
];

static SENSATIONAL_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SENSATIONAL.iter().copied().collect());
static OPTIMISM_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| OPTIMISM.iter().copied().collect());
static FORWARD_PROGRESS_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FORWARD_PROGRESS.iter().copied().collect());

/// Which fixed list to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexicon {
    Sensational,
    Optimism,
    ForwardProgress,
}

impl Lexicon {
    fn set(self) -> &'static HashSet<&'static str> {
        match self {
            Lexicon::Sensational => &SENSATIONAL_SET,
            Lexicon::Optimism => &OPTIMISM_SET,
            Lexicon::ForwardProgress => &FORWARD_PROGRESS_SET,
        }
    }

    /// Count tokens (already lowercased) that belong to this list.
    pub fn hits<'a, I>(self, lowered: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set = self.set();
        lowered.into_iter().filter(|w| set.contains(w)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_lowercase_and_disjoint_from_sensational() {
        for list in [SENSATIONAL, OPTIMISM, FORWARD_PROGRESS] {
            assert!(list.iter().all(|w| w.to_lowercase() == *w));
        }
        assert!(OPTIMISM.iter().all(|w| !SENSATIONAL_SET.contains(w)));
        assert!(FORWARD_PROGRESS.iter().all(|w| !SENSATIONAL_SET.contains(w)));
    }

    #[test]
    fn hits_count_every_occurrence() {
        let toks = ["chaos", "and", "chaos", "calm"];
        assert_eq!(Lexicon::Sensational.hits(toks), 2);
        assert_eq!(Lexicon::Optimism.hits(toks), 0);
    }
}
