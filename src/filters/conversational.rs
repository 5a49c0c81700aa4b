use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::models::FilterVerdict;

/// Whole utterances that carry no proposition.
const FILLER_UTTERANCES: &[&str] = &[
    "yeah", "yes", "no", "right", "okay", "ok", "mhm", "mmm", "uh", "uhh", "um", "umm", "ah", "oh",
    "hm", "hmm", "well", "so", "now", "then", "exactly", "absolutely", "definitely", "sure", "fine",
    "good", "nice", "great", "awesome", "cool", "true", "fair enough", "that's the thing",
    "that's it", "there you go", "here we go", "that's right", "that's the thing there",
    "you know what i mean", "uh huh", "uh huh sure", "yeah right exactly", "hello", "hi", "thanks",
    "welcome", "goodbye",
];

static FILLER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(?:yeah|yes|no|right|okay|ok|mhm)\s*$",
        r"^(?:yeah|yes|no|right|okay|ok)\s+(?:right|exactly|sure)\s*$",
        r"^\w+\s+(?:i|you|we|they)\s+(?:want|need)\s+to\s+(?:compare|discuss|talk about)\b",
        r"^(?:let me|let's|i want to|i think we should)\b",
        r"^(?:wow|oh|ah)\s+(?:that was|that's|how)\s+",
        r"^(?:i see|i get it|i understand|got it|makes sense)\s*$",
        r"^(?:right|yeah|well|so|now|then)\s+.{0,30}\s+(?:right|there|true)\s*$",
        r"^that's\s+(?:it|right|true|the\s+thing)(?:\s+there)?\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid filler regex"))
    .collect()
});

static VAGUE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(?:this|that|it)\s+is\s+(?:it|the\s+thing|what\s+it\s+is)\s*$",
        r"^(?:here|there)\s+(?:it|that)\s+is\s*$",
        r"^same\s+is\s+true\s*$",
        r"^and\s+you\s+know\s+it\s*\w*\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid vague filler regex"))
    .collect()
});

const COPULAS: &[&str] = &["is", "are", "was", "were", "has", "have"];

/// Short utterances without one of these are not substantive.
const MIN_SUBSTANTIVE_WORDS: usize = 4;

/// Backchannels, acknowledgments and other pure filler.
#[derive(Debug, Clone, Default)]
pub struct ConversationalFilter;

impl ConversationalFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for ConversationalFilter {
    fn name(&self) -> &'static str {
        "conversational_filler"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        input.require_text(self.name())?;
        let lower = input.lower();
        let bare = lower.trim_end_matches(['.', '!', '?', ',', ';', ':']).trim();

        if FILLER_UTTERANCES.contains(&bare) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Pure conversational filler: '{}'", bare),
            ));
        }
        if bare.contains("want to compare notes") && (bare.contains("okay on") || bare.contains("about")) {
            return Ok(FilterVerdict::exclude(self.name(), "Topic introduction filler"));
        }
        if FILLER_PATTERNS.iter().any(|p| p.is_match(bare)) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Conversational filler pattern: '{}'", bare),
            ));
        }
        if VAGUE_PATTERNS.iter().any(|p| p.is_match(bare)) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Vague filler fragment: '{}'", bare),
            ));
        }

        let words: Vec<&str> = bare.split_whitespace().collect();
        if words.len() < MIN_SUBSTANTIVE_WORDS && !words.iter().any(|w| COPULAS.contains(w)) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Too short, filler only: {} words", words.len()),
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
    fn test_pure_filler() {
        for text in ["yeah", "Yeah.", "uh huh", "Exactly!", "fair enough"] {
            let v = verdict(&ConversationalFilter, text);
            assert!(v.excluded, "{}", text);
            assert!(v.reason.contains("filler"), "{}", v.reason);
        }
        assert_eq!(
            verdict(&ConversationalFilter, "yeah").reason,
            "Pure conversational filler: 'yeah'"
        );
    }

    #[test]
    fn test_patterns() {
        assert!(verdict(&ConversationalFilter, "Yeah right.").excluded);
        assert!(verdict(&ConversationalFilter, "Let me finish my point here please.").excluded);
        assert!(verdict(&ConversationalFilter, "That's the thing there.").excluded);
        assert!(verdict(&ConversationalFilter, "This is what it is.").excluded);
        assert!(verdict(&ConversationalFilter, "I get it").excluded);
    }

    #[test]
    fn test_short_without_copula() {
        assert!(verdict(&ConversationalFilter, "Taxes, obviously.").excluded);
        assert!(!verdict(&ConversationalFilter, "Taxes are high.").excluded);
    }

    #[test]
    fn test_substantive_statement_kept() {
        let v = verdict(&ConversationalFilter, "The unemployment rate fell to four percent.");
        assert!(!v.excluded);
        assert!(v.reason.is_empty());
    }
}
