use tracing::debug;

use super::{detection_text, ClaimDetector};
use crate::error::Result;
use crate::heuristics::{count_terms, WeightedSignals};
use crate::models::{ClaimCore, ClaimType, ClassifiedSentence};

const CAUSAL_KEYWORDS: &[&str] = &[
    "because",
    "due to",
    "caused by",
    "leads to",
    "results in",
    "brings about",
    "produces",
    "creates",
    "generates",
    "triggers",
    "stems from",
    "originates from",
    "responsible for",
    "blamed on",
    "thanks to",
    "owing to",
    "as a result of",
    "consequently",
];

const STRONG_CAUSAL: &[&str] = &[
    "directly caused",
    "primarily due to",
    "main reason",
    "root cause",
    "primary cause",
    "leading cause",
];

/// Cause-and-effect language.
#[derive(Debug)]
pub struct CausalDetector {
    signals: WeightedSignals<str>,
}

impl CausalDetector {
    pub fn new() -> Self {
        Self {
            signals: WeightedSignals::<str>::new(0.0)
                .with_base(0.5)
                .counted("causal_keyword", 0.1, |t: &str| count_terms(t, CAUSAL_KEYWORDS))
                .counted("strong_causal", 0.2, |t: &str| count_terms(t, STRONG_CAUSAL)),
        }
    }
}

impl Default for CausalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimDetector for CausalDetector {
    fn name(&self) -> &'static str {
        "causal"
    }

    fn claim_type(&self) -> ClaimType {
        ClaimType::Causal
    }

    fn detect(&self, sentence: &ClassifiedSentence) -> Result<Option<ClaimCore>> {
        let text = detection_text(self.name(), sentence)?;
        let score = self.signals.score(&text);
        if score.fired.is_empty() {
            return Ok(None);
        }

        debug!("Causal claim in {} ({:.2}) via {:?}", sentence.id, score.value, score.fired);
        Ok(Some(ClaimCore::from_sentence(sentence, ClaimType::Causal, score.value)))
    }
}
