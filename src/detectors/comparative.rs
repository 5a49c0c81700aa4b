use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{compile_patterns, count_patterns, detection_text, ClaimDetector};
use crate::error::Result;
use crate::heuristics::WeightedSignals;
use crate::models::{ClaimCore, ClaimType, ClassifiedSentence};

static COMPARATIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_patterns(&[
        r"\b(?:more|less|better|worse|higher|lower|greater|smaller)\s+than\b",
        r"\b(?:most|least|best|worst|highest|lowest|greatest|smallest)\b",
        r"\b(?:superior|inferior)\s+to\b",
        r"\b(?:exceeds|surpasses|outperforms)\b",
        r"\bcompared\s+(?:to|with)\b",
        r"\b(?:versus|vs\.?)(?:\s|$)",
    ])
});

/// Comparisons and superlatives.
#[derive(Debug)]
pub struct ComparativeDetector {
    signals: WeightedSignals<str>,
}

impl ComparativeDetector {
    pub fn new() -> Self {
        Self {
            signals: WeightedSignals::<str>::new(0.0)
                .with_base(0.5)
                .counted("comparative_pattern", 0.15, |t: &str| {
                    count_patterns(&COMPARATIVE_PATTERNS, t)
                }),
        }
    }
}

impl Default for ComparativeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimDetector for ComparativeDetector {
    fn name(&self) -> &'static str {
        "comparative"
    }

    fn claim_type(&self) -> ClaimType {
        ClaimType::Comparative
    }

    fn detect(&self, sentence: &ClassifiedSentence) -> Result<Option<ClaimCore>> {
        let text = detection_text(self.name(), sentence)?;
        let score = self.signals.score(&text);
        if score.fired.is_empty() {
            return Ok(None);
        }

        debug!("Comparative claim in {} ({:.2})", sentence.id, score.value);
        Ok(Some(ClaimCore::from_sentence(sentence, ClaimType::Comparative, score.value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Option<ClaimCore> {
        ComparativeDetector::new()
            .detect(&ClassifiedSentence::statement(text))
            .unwrap()
    }

    #[test]
    fn test_patterns_accumulate() {
        let claim = detect("Crime is higher than it was.").unwrap();
        assert!((claim.confidence - 0.65).abs() < 1e-9);

        let claim = detect("It is the highest rate compared to Europe.").unwrap();
        assert!((claim.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_versus() {
        assert!(detect("Ohio vs. Texas on jobs.").is_some());
        assert!(detect("The vote was close.").is_none());
    }
}
