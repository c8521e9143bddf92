use serde::{Deserialize, Serialize};

/// Polarity assigned to a piece of text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Strict case-insensitive parse; `None` for anything outside the three labels
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "neutral" => Some(SentimentLabel::Neutral),
            "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }

    /// Case-insensitive label lookup. Missing or unrecognized labels are neutral.
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the sentiment analyzer for one title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// -1.0 to +1.0, rounded to 4 decimals
    pub score: f64,
    /// 0.0 to 1.0, rounded to 4 decimals
    pub confidence: f64,
}

impl SentimentResult {
    pub const NEUTRAL: SentimentResult = SentimentResult {
        label: SentimentLabel::Neutral,
        score: 0.0,
        confidence: 0.0,
    };
}

/// Analyzer result plus the lexicon entries that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentTerms {
    #[serde(flatten)]
    pub result: SentimentResult,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub title: String,
}

/// Article counts per normalized label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SentimentCounts {
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

impl SentimentCounts {
    pub fn record(&mut self, label: SentimentLabel) {
        self.add(label, 1);
    }

    pub fn add(&mut self, label: SentimentLabel, count: i64) {
        match label {
            SentimentLabel::Positive => self.positive += count,
            SentimentLabel::Neutral => self.neutral += count,
            SentimentLabel::Negative => self.negative += count,
        }
    }

    pub fn total(&self) -> i64 {
        self.positive + self.neutral + self.negative
    }
}
