use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{compile_patterns, detection_text, ClaimDetector};
use crate::error::Result;
use crate::heuristics::{count_terms, WeightedSignals};
use crate::models::{ClaimCore, ClaimType, ClassifiedSentence};

static STATISTICAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_patterns(&[
        // 50%, 3.5 percent
        r"\b\d+(?:\.\d+)?%|\b\d+(?:\.\d+)?\s*percent\b",
        // 2 million, 1,500 billion
        r"\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:million|billion|trillion|thousand)\b",
        r"\b\d{1,3}(?:,\d{3})+\b",
        // 3 in 4, 1 out of 5
        r"\b\d+\s+(?:in|out\s+of)\s+\d+\b",
        r"\b\d+(?:\.\d+)?\s+per\s+\w+\b",
    ])
});

const STAT_KEYWORDS: &[&str] = &[
    "data", "statistics", "survey", "poll", "study", "research", "analysis", "report", "findings",
    "rate", "level", "average", "median", "mean", "increase", "decrease", "growth", "decline",
];

/// Percentages, large or comma-grouped numbers, ratios and rates.
#[derive(Debug)]
pub struct StatisticalDetector {
    signals: WeightedSignals<str>,
}

impl StatisticalDetector {
    pub fn new() -> Self {
        Self {
            signals: WeightedSignals::<str>::new(0.0)
                .with_base(0.6)
                .signal("stat_keyword", 0.2, |t: &str| count_terms(t, STAT_KEYWORDS) > 0),
        }
    }
}

impl Default for StatisticalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimDetector for StatisticalDetector {
    fn name(&self) -> &'static str {
        "statistical"
    }

    fn claim_type(&self) -> ClaimType {
        ClaimType::Statistical
    }

    fn detect(&self, sentence: &ClassifiedSentence) -> Result<Option<ClaimCore>> {
        let text = detection_text(self.name(), sentence)?;
        if !STATISTICAL_PATTERNS.iter().any(|p| p.is_match(&text)) {
            return Ok(None);
        }

        let score = self.signals.score(&text);
        debug!("Statistical claim in {} ({:.2})", sentence.id, score.value);
        Ok(Some(ClaimCore::from_sentence(sentence, ClaimType::Statistical, score.value)))
    }
}
