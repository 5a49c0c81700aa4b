use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{compile_patterns, count_patterns, detection_text, ClaimDetector};
use crate::error::Result;
use crate::heuristics::{count_terms, WeightedSignals};
use crate::models::{ClaimCore, ClaimType, ClassifiedSentence};

static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_patterns(&[
        r"\b(?:in|during|since|from|until|by)\s+\d{4}\b",
        r"\b\d{4}(?:-\d{4})?\b",
        r"\b(?:last|past|previous)\s+(?:year|decade|century|month)\b",
        r"\b(?:decades?|centuries?)\s+ago\b",
        r"\b(?:historically|traditionally|previously|formerly)\b",
        r"\b(?:used to|had been|were|was)\b.*\b(?:ago|back then|at that time)\b",
    ])
});

const PAST_INDICATORS: &[&str] = &[
    "happened",
    "occurred",
    "took place",
    "began",
    "started",
    "ended",
    "concluded",
    "established",
    "founded",
    "created",
    "implemented",
    "introduced",
    "adopted",
];

/// References to dates, eras and past events.
#[derive(Debug)]
pub struct HistoricalDetector {
    signals: WeightedSignals<str>,
}

impl HistoricalDetector {
    pub fn new() -> Self {
        Self {
            signals: WeightedSignals::<str>::new(0.0)
                .with_base(0.4)
                .counted("time_reference", 0.2, |t: &str| count_patterns(&TIME_PATTERNS, t))
                .counted("past_event", 0.1, |t: &str| count_terms(t, PAST_INDICATORS)),
        }
    }
}

impl Default for HistoricalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimDetector for HistoricalDetector {
    fn name(&self) -> &'static str {
        "historical"
    }

    fn claim_type(&self) -> ClaimType {
        ClaimType::Historical
    }

    fn detect(&self, sentence: &ClassifiedSentence) -> Result<Option<ClaimCore>> {
        let text = detection_text(self.name(), sentence)?;
        let time_refs = count_patterns(&TIME_PATTERNS, &text);
        let past_events = count_terms(&text, PAST_INDICATORS);
        // a single past verb is too weak on its own
        if time_refs == 0 && past_events < 2 {
            return Ok(None);
        }

        let score = self.signals.score(&text);
        debug!(
            "Historical claim in {} ({:.2}): {} time refs, {} past events",
            sentence.id, score.value, time_refs, past_events
        );
        Ok(Some(ClaimCore::from_sentence(sentence, ClaimType::Historical, score.value)))
    }
}
