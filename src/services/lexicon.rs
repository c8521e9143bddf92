//! Fixed word and phrase tables used by the sentiment analyzer.
//!
//! Every entry is stored lower-case; callers look up tokens that were already
//! lower-cased by the tokenizer. The tables are built once on first use and never
//! mutated afterwards.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const POSITIVE_WORDS: &[&str] = &[
    "achieve", "achieved", "achievement", "agreement", "approval", "approve", "approved",
    "award", "awarded", "benefit", "benefits", "best", "better", "boom", "booming", "boost",
    "boosted", "boosts", "breakthrough", "celebrate", "celebrates", "celebration", "confident",
    "deal", "excellent", "expand", "expands", "expansion", "gain", "gained", "gains", "good",
    "great", "grow", "growing", "grows", "growth", "happy", "hero", "honour", "honoured",
    "hope", "hopeful", "improve", "improved", "improvement", "improves", "innovation",
    "innovative", "investment", "jump", "jumps", "milestone", "optimism", "optimistic",
    "peace", "positive", "praise", "praised", "profit", "profitable", "profits", "progress",
    "rebound", "rebounds", "record", "recover", "recovered", "recovers", "recovery", "relief",
    "rescue", "rescued", "resilient", "rise", "rises", "rising", "rose", "safe", "soar",
    "soared", "soars", "stability", "stable", "strong", "stronger", "strongest", "succeed",
    "success", "successful", "support", "supports", "surge", "surged", "surges", "thrive",
    "thriving", "upgrade", "upgraded", "victory", "welcome", "welcomed", "win", "winning",
    "wins", "won",
];

const NEGATIVE_WORDS: &[&str] = &[
    "abuse", "accident", "arrest", "arrested", "attack", "attacks", "bad", "ban", "banned",
    "bankrupt", "bankruptcy", "breach", "charged", "charges", "closure", "collapse",
    "collapsed", "collapses", "concern", "concerns", "condemned", "controversy", "corruption",
    "crash", "crashed", "crashes", "crime", "crisis", "criticised", "criticism", "criticized",
    "cut", "cuts", "danger", "dangerous", "dead", "death", "deaths", "debt", "decline",
    "declined", "declines", "deficit", "delay", "delayed", "delays", "died", "dies",
    "disaster", "downgrade", "downgraded", "downturn", "drop", "dropped", "drops",
    "earthquake", "emergency", "fail", "failed", "fails", "failure", "fall", "falling",
    "falls", "fear", "fears", "fell", "fire", "fires", "flood", "flooding", "floods", "fraud",
    "guilty", "hack", "hacked", "inflation", "injured", "injuries", "injury",
    "investigation", "jail", "kill", "killed", "kills", "lawsuit", "layoffs", "lose",
    "loses", "loss", "losses", "lost", "low", "lowest", "miss", "missed", "misses", "murder",
    "negative", "outrage", "plunge", "plunged", "plunges", "poor", "prison", "problem",
    "problems", "protest", "protests", "recall", "recession", "redundancies", "reject",
    "rejected", "risk", "risks", "sanctions", "scam", "scandal", "sentenced", "shooting",
    "shortage", "slowdown", "slump", "slumps", "stolen", "storm", "strike", "strikes",
    "struggle", "struggles", "struggling", "sue", "sued", "theft", "threat", "threats",
    "toxic", "tragedy", "tragic", "victim", "victims", "violence", "violent", "war", "warn",
    "warning", "warns", "weak", "weaker", "weakest", "worried", "worries", "worry", "worse",
    "worst",
];

const INTENSIFIERS: &[&str] = &[
    "very", "extremely", "highly", "really", "so", "too", "incredibly", "hugely",
    "massively", "deeply", "seriously", "sharply", "significantly", "strongly",
    "particularly", "especially", "exceptionally", "remarkably", "super", "most",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without",
    "cannot", "can't", "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't",
    "weren't", "won't", "wouldn't", "shouldn't", "couldn't", "hasn't", "haven't",
    "hadn't", "hardly", "barely",
];

const CONTRAST_WORDS: &[&str] = &["but", "however", "although", "though", "yet"];

const POSITIVE_PHRASES: &[&str] = &[
    "all time high", "record high", "better than expected", "beats expectations",
    "beat expectations", "exceeds expectations", "back on track", "turns a profit",
    "step forward", "new record", "on the rise", "strong demand", "job creation",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "record low", "worse than expected", "misses expectations", "missed expectations",
    "falls short", "job losses", "job cuts", "cost of living", "state of emergency",
    "death toll", "under investigation", "calls off", "shut down", "data breach",
    "on the brink", "out of control",
];

/// Immutable sentiment tables
#[derive(Debug)]
pub struct Lexicon {
    pub positive: HashSet<&'static str>,
    pub negative: HashSet<&'static str>,
    pub intensifiers: HashSet<&'static str>,
    pub negators: HashSet<&'static str>,
    pub contrast: HashSet<&'static str>,
    pub positive_phrases: Vec<&'static str>,
    pub negative_phrases: Vec<&'static str>,
}

impl Lexicon {
    fn build() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
            contrast: CONTRAST_WORDS.iter().copied().collect(),
            positive_phrases: POSITIVE_PHRASES.to_vec(),
            negative_phrases: NEGATIVE_PHRASES.to_vec(),
        }
    }

    pub fn is_positive(&self, token: &str) -> bool {
        self.positive.contains(token)
    }

    pub fn is_negative(&self, token: &str) -> bool {
        self.negative.contains(token)
    }

    pub fn is_intensifier(&self, token: &str) -> bool {
        self.intensifiers.contains(token)
    }

    pub fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token)
    }

    pub fn is_contrast(&self, token: &str) -> bool {
        self.contrast.contains(token)
    }
}

pub static LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::build);
