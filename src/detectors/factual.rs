use tracing::debug;

use super::{detection_text, ClaimDetector};
use crate::error::Result;
use crate::heuristics::{count_terms, WeightedSignals};
use crate::models::{ClaimCore, ClaimType, ClassifiedSentence};

const UNCERTAINTY_WORDS: &[&str] = &[
    "might", "may", "could", "would", "should", "possibly", "probably", "likely", "perhaps",
    "maybe", "seems", "appears", "believes", "thinks", "feels", "opinions", "suggests",
];

const CERTAINTY_WORDS: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "will", "does", "did", "facts", "evidence", "proof",
    "confirmed",
];

/// Emission requires strictly more than this.
const MIN_FACTUAL_CONFIDENCE: f64 = 0.3;

/// General declarative content, discounted by hedging.
///
/// Runs last and emits for most plain statements; the filter chain does the
/// real work of discarding chatter.
#[derive(Debug)]
pub struct FactualDetector {
    signals: WeightedSignals<str>,
}

impl FactualDetector {
    pub fn new() -> Self {
        Self {
            signals: WeightedSignals::<str>::new(MIN_FACTUAL_CONFIDENCE)
                .with_base(0.4)
                .counted("hedge", -0.1, |t: &str| count_terms(t, UNCERTAINTY_WORDS))
                .counted("certainty", 0.05, |t: &str| count_terms(t, CERTAINTY_WORDS)),
        }
    }
}

impl Default for FactualDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimDetector for FactualDetector {
    fn name(&self) -> &'static str {
        "factual"
    }

    fn claim_type(&self) -> ClaimType {
        ClaimType::Factual
    }

    fn detect(&self, sentence: &ClassifiedSentence) -> Result<Option<ClaimCore>> {
        let text = detection_text(self.name(), sentence)?;
        let score = self.signals.score(&text);
        if score.value <= MIN_FACTUAL_CONFIDENCE {
            debug!("No factual claim in {} ({:.2})", sentence.id, score.value);
            return Ok(None);
        }

        Ok(Some(ClaimCore::from_sentence(sentence, ClaimType::Factual, score.value)))
    }
}
