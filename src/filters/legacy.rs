//! The older, broad filters that close out the chain.

use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::heuristics::{contains_term, matched_terms};
use crate::models::FilterVerdict;

static QUESTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*(?:what|how|why|when|where|who|which|whose)\s+",
        r"^\s*(?:do|does|did|can|could|would|should|will|is|are|was|were)\s+you\s+",
        r"^\s*(?:are|is|was|were|do|does|did)\s+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid question regex"))
    .collect()
});

/// Questions are not claims.
#[derive(Debug, Clone)]
pub struct QuestionFilter {
    drop_questions: bool,
}

impl QuestionFilter {
    pub fn new(drop_questions: bool) -> Self {
        Self { drop_questions }
    }
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ClaimFilter for QuestionFilter {
    fn name(&self) -> &'static str {
        "question"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;

        if text.ends_with('?') {
            return Ok(if self.drop_questions {
                FilterVerdict::exclude(self.name(), "Direct question")
            } else {
                FilterVerdict::rescued(self.name(), "question-allowed-for-review")
            });
        }
        let lower = input.lower();
        if QUESTION_PATTERNS.iter().any(|p| p.is_match(&lower)) {
            return Ok(FilterVerdict::exclude(self.name(), "Question pattern detected"));
        }
        Ok(FilterVerdict::keep())
    }
}

const HYPOTHETICAL_INDICATORS: &[&str] = &[
    "let's say",
    "suppose",
    "imagine",
    "what if",
    "if you",
    "if we",
    "consider",
    "for example",
    "for instance",
    "hypothetically",
    "in theory",
    "theoretically",
    "let me give you an example",
    "picture this",
    "think about",
    "let's imagine",
];

/// Hypotheticals, examples and thought experiments.
#[derive(Debug, Clone, Default)]
pub struct HypotheticalFilter;

impl HypotheticalFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for HypotheticalFilter {
    fn name(&self) -> &'static str {
        "hypothetical"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        input.require_text(self.name())?;
        let lower = input.lower();

        Ok(match matched_terms(&lower, HYPOTHETICAL_INDICATORS).first() {
            Some(indicator) => FilterVerdict::exclude(
                self.name(),
                format!("Hypothetical scenario: contains '{}'", indicator),
            ),
            None => FilterVerdict::keep(),
        })
    }
}

/// Transcription artifacts seen in concatenated captions.
const CORRUPTION_INDICATORS: &[&str] = &["point true", "point right"];

static MANGLED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\w+\s*(?:right|yeah|well)\s+.{5,30}\s+(?:right|there|true|point)\s+\w*\s*$",
        r"^(?:right|yeah|well)\s+\w+\s+(?:did|have|had|was|were)\s+\w+\s+to\s+(?:not|n't)\s+",
        r"\s+(?:falls flat|point true|that's right)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid mangled regex"))
    .collect()
});

const MANGLED_FILLER: &[&str] = &["right", "yeah", "well", "uh", "um", "so", "like"];
const LONG_UNPUNCTUATED_WORDS: usize = 30;
const MAX_FILLER_SHARE: f64 = 0.4;

/// Corrupted, concatenated or filler-saturated text.
#[derive(Debug, Clone, Default)]
pub struct MangledTextFilter;

impl MangledTextFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for MangledTextFilter {
    fn name(&self) -> &'static str {
        "mangled_text"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();

        if let Some(indicator) = CORRUPTION_INDICATORS.iter().find(|i| contains_term(&lower, i)) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Text corruption detected: contains '{}'", indicator),
            ));
        }
        if MANGLED_PATTERNS.iter().any(|p| p.is_match(&lower)) {
            return Ok(FilterVerdict::exclude(self.name(), "Mangled text pattern"));
        }

        let words: Vec<&str> = lower.split_whitespace().collect();
        if words.len() > LONG_UNPUNCTUATED_WORDS && !text.contains(['.', '!', '?', ';', ':']) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Suspiciously long unpunctuated text: {} words", words.len()),
            ));
        }

        let filler = words.iter().filter(|w| MANGLED_FILLER.contains(w)).count();
        if words.len() > 5 && filler as f64 / words.len() as f64 > MAX_FILLER_SHARE {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Too many filler words: {}/{}", filler, words.len()),
            ));
        }
        Ok(FilterVerdict::keep())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::verdict;

    #[test]
    fn test_questions() {
        assert_eq!(verdict(&QuestionFilter::default(), "Is that true?").reason, "Direct question");
        assert_eq!(
            verdict(&QuestionFilter::default(), "Why the deficit keeps growing is no mystery.").reason,
            "Question pattern detected"
        );

        let lenient = QuestionFilter::new(false);
        let v = verdict(&lenient, "Is that true?");
        assert!(!v.excluded);
        assert_eq!(v.reason, "question-allowed-for-review");
    }

    #[test]
    fn test_hypotheticals_whole_word() {
        let v = verdict(&HypotheticalFilter, "Suppose the tax cut passes next year.");
        assert_eq!(v.reason, "Hypothetical scenario: contains 'suppose'");
        // "reconsidered" does not contain the word "consider"
        assert!(!verdict(&HypotheticalFilter, "The court reconsidered the ruling in May.").excluded);
    }

    #[test]
    fn test_mangled() {
        assert!(verdict(&MangledTextFilter, "and it falls flat there Point true").excluded);
        let long = vec!["word"; 31].join(" ");
        assert!(verdict(&MangledTextFilter, &long).reason.starts_with("Suspiciously long"));
        assert!(verdict(&MangledTextFilter, "yeah right so well um the plan").excluded);
        assert!(!verdict(&MangledTextFilter, "The plan passed the Senate in March.").excluded);
    }
}
