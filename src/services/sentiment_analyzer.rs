use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SentimentLabel, SentimentResult, SentimentTerms};
use crate::services::lexicon::{Lexicon, LEXICON};

const PHRASE_WEIGHT: f64 = 1.75;
const INTENSIFIED_WEIGHT: f64 = 1.5;
const CONTRAST_MULTIPLIER: f64 = 1.2;
const QUESTION_DAMPING: f64 = 0.9;
const NORMALIZATION_DIVISOR: f64 = 3.0;
const LABEL_THRESHOLD: f64 = 0.2;
const REANALYZE_CONFIDENCE: f64 = 0.3;
const MAX_TERMS: usize = 8;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}'’]+").unwrap_or_else(|e| panic!("invalid token pattern: {e}"))
});

/// Split text into lower-cased runs of letters and apostrophes
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().replace('’', "'"))
        .collect()
}

/// Score a title. Never fails: empty or wordless input is neutral with zero confidence.
pub fn analyze(title: &str) -> SentimentResult {
    analyze_with_terms(title).result
}

/// Score a title and report which lexicon entries matched
pub fn analyze_with_terms(title: &str) -> SentimentTerms {
    let tokens = tokenize(title);
    if tokens.is_empty() {
        return SentimentTerms {
            result: SentimentResult::NEUTRAL,
            positive_words: Vec::new(),
            negative_words: Vec::new(),
        };
    }

    let mut pass = ScoringPass::default();
    pass.score_phrases(&LEXICON, &tokens.join(" "));
    pass.score_tokens(&LEXICON, &tokens);

    let mut raw = pass.raw;
    if title.contains('?') {
        raw *= QUESTION_DAMPING;
    }

    let normalized = (raw / NORMALIZATION_DIVISOR).tanh();
    let label = classify(normalized);

    let coverage = pass.matched as f64 / tokens.len().max(1) as f64;
    let confidence = normalized.abs().max(coverage).clamp(0.0, 1.0);

    SentimentTerms {
        result: SentimentResult {
            label,
            score: round4(normalized),
            confidence: round4(confidence),
        },
        positive_words: pass.positive_terms,
        negative_words: pass.negative_terms,
    }
}

/// Thresholds are inclusive toward positive and negative
fn classify(normalized: f64) -> SentimentLabel {
    if normalized >= LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if normalized <= -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Whether stored or scraper-supplied sentiment should be replaced by a fresh analysis.
///
/// True when the label is blank or neutral (case-insensitive), or the confidence is below 0.3.
pub fn should_reanalyze(label: &str, confidence: f64) -> bool {
    let label = label.trim();
    label.is_empty() || label.eq_ignore_ascii_case("neutral") || confidence < REANALYZE_CONFIDENCE
}

#[derive(Default)]
struct ScoringPass {
    raw: f64,
    matched: usize,
    positive_terms: Vec<String>,
    negative_terms: Vec<String>,
}

impl ScoringPass {
    fn score_phrases(&mut self, lexicon: &Lexicon, joined: &str) {
        for phrase in &lexicon.positive_phrases {
            if joined.contains(phrase) {
                self.raw += PHRASE_WEIGHT;
                self.matched += 1;
                push_term(&mut self.positive_terms, phrase);
            }
        }
        for phrase in &lexicon.negative_phrases {
            if joined.contains(phrase) {
                self.raw -= PHRASE_WEIGHT;
                self.matched += 1;
                push_term(&mut self.negative_terms, phrase);
            }
        }
    }

    fn score_tokens(&mut self, lexicon: &Lexicon, tokens: &[String]) {
        let mut first_contrast: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            let prev = i.checked_sub(1).map(|j| tokens[j].as_str());
            let prev2 = i.checked_sub(2).map(|j| tokens[j].as_str());

            let prev_intensifies = prev.is_some_and(|p| lexicon.is_intensifier(p));
            let mut weight = if prev_intensifies { INTENSIFIED_WEIGHT } else { 1.0 };
            if first_contrast.is_some_and(|c| i > c) {
                weight *= CONTRAST_MULTIPLIER;
            }

            let negated = prev.is_some_and(|p| lexicon.is_negator(p))
                || (prev2.is_some_and(|p| lexicon.is_negator(p)) && prev_intensifies);
            let signed = if negated { -weight } else { weight };

            if lexicon.is_positive(token) {
                self.raw += signed;
                self.matched += 1;
                push_term(&mut self.positive_terms, token);
            } else if lexicon.is_negative(token) {
                self.raw -= signed;
                self.matched += 1;
                push_term(&mut self.negative_terms, token);
            }

            if first_contrast.is_none() && lexicon.is_contrast(token) {
                first_contrast = Some(i);
            }
        }
    }
}

fn push_term(terms: &mut Vec<String>, term: &str) {
    if terms.len() < MAX_TERMS && !terms.iter().any(|t| t == term) {
        terms.push(term.to_string());
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_titles_are_neutral() {
        assert_eq!(analyze(""), SentimentResult::NEUTRAL);
        assert_eq!(analyze("   "), SentimentResult::NEUTRAL);
        assert_eq!(analyze("2026 - 42%"), SentimentResult::NEUTRAL);
    }

    #[test]
    fn test_tokenizer_keeps_letters_and_apostrophes() {
        assert_eq!(
            tokenize("Markets DON’T rally: 3.5% drop!"),
            vec!["markets", "don't", "rally", "drop"]
        );
        assert_eq!(tokenize("Māori-led café reopens"), vec!["māori", "led", "café", "reopens"]);
    }

    #[test]
    fn test_positive_headline() {
        let result = analyze("Company reports record growth");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.2);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_negative_headline() {
        let result = analyze("Company faces fraud investigation");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score < -0.2);
    }

    #[test]
    fn test_no_lexicon_hits_is_neutral() {
        let result = analyze("Markets open Monday");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, 0.0);

        let result = analyze("Company announces a new office opening in Seattle");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_negation_lowers_score() {
        let plain = analyze("Profits are strong");
        let negated = analyze("Profits are not strong");
        assert!(negated.score < plain.score);
    }

    #[test]
    fn test_negation_through_intensifier() {
        // "not very good": the negator sits two tokens back behind an intensifier
        let result = analyze("Outlook not very good");
        assert!(result.score < 0.0);
        assert_eq!(result.score, round4((-1.5f64 / 3.0).tanh()));
    }

    #[test]
    fn test_intensifier_increases_magnitude() {
        let plain = analyze("strong growth");
        let intensified = analyze("very strong growth");
        assert!(intensified.score.abs() >= plain.score.abs());
        assert_eq!(intensified.score, round4((2.5f64 / 3.0).tanh()));
    }

    #[test]
    fn test_contrast_weights_every_later_token() {
        // growth +1, then after "but": losses -1.2, crisis -1.2
        let result = analyze("Growth continues but losses and crisis loom");
        assert_eq!(result.score, round4((-1.4f64 / 3.0).tanh()));
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_phrases_add_weight() {
        // phrase "record high" +1.75, record +1
        let result = analyze("Shares hit record high");
        assert_eq!(result.score, round4((2.75f64 / 3.0).tanh()));
        let terms = analyze_with_terms("Shares hit record high");
        assert_eq!(terms.positive_words, vec!["record high", "record"]);
    }

    #[test]
    fn test_question_damping_applies_once() {
        let statement = analyze("Is growth strong");
        let one = analyze("Is growth strong?");
        let many = analyze("Is growth strong???");
        assert_eq!(one.score, round4((2.0 * 0.9f64 / 3.0).tanh()));
        assert_eq!(one, many);
        assert!(one.score < statement.score);
    }

    #[test]
    fn test_label_thresholds_are_inclusive() {
        assert_eq!(classify(0.2), SentimentLabel::Positive);
        assert_eq!(classify(-0.2), SentimentLabel::Negative);
        assert_eq!(classify(0.1999), SentimentLabel::Neutral);
        assert_eq!(classify(-0.1999), SentimentLabel::Neutral);
    }

    #[test]
    fn test_single_damped_hit_stays_positive() {
        // tanh(0.9 / 3) = 0.2913
        let result = analyze("Is it a win?");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 0.2913);
        assert_eq!(result.confidence, 0.2913);
    }

    #[test]
    fn test_confidence_uses_coverage_when_score_cancels() {
        let result = analyze("Profits are not strong");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_confidence_is_clamped() {
        // phrases and tokens both count as matches, so coverage can exceed 1
        let result = analyze("data breach");
        assert!(result.confidence <= 1.0);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let title = "Bank files bankruptcy after data breach and fraud investigation";
        let first = analyze(title);
        let second = analyze(title);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
        assert_eq!(first.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_terms_split_by_polarity() {
        let terms = analyze_with_terms("Tech company reports strong growth despite losses");
        assert_eq!(terms.positive_words, vec!["strong", "growth"]);
        assert_eq!(terms.negative_words, vec!["losses"]);
        assert_eq!(terms.result, analyze("Tech company reports strong growth despite losses"));
    }

    #[test]
    fn test_should_reanalyze_policy() {
        assert!(should_reanalyze("", 0.9));
        assert!(should_reanalyze("neutral", 0.9));
        assert!(should_reanalyze("Neutral", 0.9));
        assert!(should_reanalyze("positive", 0.29));
        assert!(!should_reanalyze("positive", 0.3));
        assert!(!should_reanalyze("negative", 0.8));
    }
}
