use tracing::debug;

use crate::heuristics::matched_terms;
use crate::models::{ClaimAnnotation, ClaimCore, ClaimType};

/// Philosophical, ethical and opinion vocabulary.
///
/// Words that also carry empirical meaning in debate ("randomness",
/// "better", "worse", "right", "important") are left out.
const PHILOSOPHICAL_TERMS: &[&str] = &[
    "free will",
    "determinism",
    "predetermined",
    "choice",
    "agency",
    "moral responsibility",
    "consciousness",
    "causality",
    "causal",
    "antecedent",
    "logical conclusion",
    "unpredictability",
    "philosophy",
    "philosophical",
    "metaphysics",
    "ontology",
    "epistemology",
    "ethics",
    "morality",
    "should",
    "ought to",
    "must",
    "wrong",
    "good",
    "bad",
    "moral",
    "ethical",
    "justice",
    "fair",
    "unfair",
    "i believe",
    "i think",
    "i feel",
    "in my opinion",
    "my view",
    "perspective",
    "worldview",
    "valuable",
    "meaningful",
    "worthwhile",
    "desirable",
    "undesirable",
    "preferable",
];

const EMPIRICAL_TERMS: &[&str] = &[
    "study shows",
    "research indicates",
    "data suggests",
    "evidence",
    "measured",
    "observed",
    "recorded",
    "documented",
    "tested",
    "according to",
    "reported",
    "stated",
    "announced",
    "confirmed",
    "verified",
    "established fact",
    "proven",
];

/// Labels surviving claims as normative or leaves them fact-checkable.
#[derive(Debug, Clone, Default)]
pub struct NormativeClassifier;

impl NormativeClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, claim: &ClaimCore) -> ClaimAnnotation {
        let lower = claim.text.to_lowercase().replace('\u{2019}', "'");

        let philosophical = matched_terms(&lower, PHILOSOPHICAL_TERMS);
        if !philosophical.is_empty() {
            debug!("{} is normative: {:?}", claim.id, philosophical);
            return ClaimAnnotation {
                claim_type: ClaimType::Normative,
                should_fact_check: false,
                classification_reason: format!("Philosophical content detected: {:?}", philosophical),
            };
        }

        let empirical = matched_terms(&lower, EMPIRICAL_TERMS);
        let classification_reason = if empirical.is_empty() {
            "Neutral content - allowing fact-checking".to_string()
        } else {
            format!("Empirical content detected: {:?}", empirical)
        };

        ClaimAnnotation {
            claim_type: claim.claim_type,
            should_fact_check: true,
            classification_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::claim;

    #[test]
    fn test_normative() {
        let annotation = NormativeClassifier::new().classify(&claim("We should raise the minimum wage."));
        assert_eq!(annotation.claim_type, ClaimType::Normative);
        assert!(!annotation.should_fact_check);
        assert_eq!(annotation.classification_reason, "Philosophical content detected: [\"should\"]");
    }

    #[test]
    fn test_empirical_and_neutral() {
        let classifier = NormativeClassifier::new();
        let annotation = classifier.classify(&claim("The report was confirmed by auditors."));
        assert_eq!(annotation.claim_type, ClaimType::Factual);
        assert!(annotation.should_fact_check);
        assert!(annotation.classification_reason.starts_with("Empirical content detected"));

        let annotation = classifier.classify(&claim(
            "so there is also stochastic uncertainty in the universe it's built in there's randomness.",
        ));
        assert_eq!(annotation.claim_type, ClaimType::Factual);
        assert!(annotation.should_fact_check);
        assert_eq!(annotation.classification_reason, "Neutral content - allowing fact-checking");
    }

    #[test]
    fn test_whole_word_matching() {
        // "goods" and "badge" are not "good" and "bad"
        let annotation = NormativeClassifier::new().classify(&claim("Imported goods now need a customs badge."));
        assert_eq!(annotation.claim_type, ClaimType::Factual);
    }
}
