use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterConfig, FilterInput};
use crate::error::Result;
use crate::heuristics::{has_irregular_past, words, Anchors};
use crate::models::FilterVerdict;

/// "it is X", "that's X": acceptable when earlier context gives it meaning.
static SHORT_COPULA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:it|this|that|they|we|he|she)(?:\s+is|['\u{2019}]s)\s+\w+[.!]?$")
        .expect("valid short copula regex")
});

static FILLER_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:um+|uh+|erm+|like|you know|i mean)\b").expect("valid filler lead regex")
});

static AUXILIARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:is|are|was|were|has|have|had|does|do|did|can|could|should|would|may|might|must)\b")
        .expect("valid auxiliary regex")
});

static VERB_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]+(?:ed|ing|en)\b").expect("valid verb suffix regex"));

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
    "up", "about", "into", "through", "during", "before", "after", "above", "below", "between",
    "among", "under", "over", "out", "off", "down", "well", "so", "ok", "okay", "uh", "um", "like",
    "you", "know", "i", "me", "my", "mine", "we", "us", "our", "ours", "your", "yours", "he",
    "him", "his", "she", "her", "hers", "it", "its", "they", "them", "their", "theirs",
];

/// Minimum length and content with anchor rescue.
///
/// Short or content-poor claims are dropped unless they carry an anchor
/// (digit, money/percent, multi-word proper name, domain term). A bare
/// "it is X" survives when enough same-turn context precedes it.
#[derive(Debug, Clone)]
pub struct MinimumContentFilter {
    anchors: Anchors,
    min_tokens_no_anchor: usize,
    min_content_words: usize,
    short_copula_context_chars: usize,
    filler_lead_min_tokens: usize,
}

impl MinimumContentFilter {
    pub fn new(config: &FilterConfig, anchors: Anchors) -> Self {
        Self {
            anchors,
            min_tokens_no_anchor: config.min_tokens_no_anchor,
            min_content_words: config.min_content_words,
            short_copula_context_chars: config.short_copula_context_chars,
            filler_lead_min_tokens: config.filler_lead_min_tokens,
        }
    }

    fn allow_short_copula(&self, input: &FilterInput<'_>) -> bool {
        SHORT_COPULA.is_match(input.text)
            && input.context_before.trim().chars().count() >= self.short_copula_context_chars
    }
}

impl Default for MinimumContentFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default(), Anchors::default())
    }
}

impl ClaimFilter for MinimumContentFilter {
    fn name(&self) -> &'static str {
        "minimum_content"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();
        let tokens = input.token_count();
        let anchored = self.anchors.is_anchored(text);

        if tokens < self.min_tokens_no_anchor && !anchored {
            if self.allow_short_copula(input) {
                return Ok(FilterVerdict::rescued(self.name(), "short-copula-with-context"));
            }
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!("Too short: {} tokens (no anchors)", tokens),
            ));
        }

        if FILLER_LEAD.is_match(&lower) && tokens < self.filler_lead_min_tokens {
            return Ok(FilterVerdict::exclude(
                self.name(),
                "Filler lead-in with insufficient content",
            ));
        }

        let content = words(&lower)
            .into_iter()
            .filter(|w| w.chars().all(|c| c.is_ascii_alphabetic()) && !STOP_WORDS.contains(&w.as_str()))
            .count();
        if content < self.min_content_words && !anchored {
            if self.allow_short_copula(input) {
                return Ok(FilterVerdict::rescued(self.name(), "short-copula-with-context"));
            }
            return Ok(FilterVerdict::exclude(
                self.name(),
                format!(
                    "Too few content words: {}/{} (no anchors)",
                    content, self.min_content_words
                ),
            ));
        }

        if !(AUXILIARY.is_match(&lower) || VERB_SUFFIX.is_match(&lower) || has_irregular_past(&lower)) {
            return Ok(FilterVerdict::exclude(self.name(), "No predicate signal"));
        }

        Ok(FilterVerdict::keep())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{verdict, verdict_with_context};

    #[test]
    fn test_anchor_rescue() {
        let filter = MinimumContentFilter::default();
        let v = verdict(&filter, "The program has cost taxpayers.");
        assert!(v.excluded);
        assert_eq!(v.reason, "Too short: 5 tokens (no anchors)");

        assert!(!verdict(&filter, "The program has cost taxpayers $22 billion.").excluded);
        assert!(!verdict(&filter, "The Senate has rejected it.").excluded);
        assert!(!verdict(&filter, "Joe Biden has vetoed it.").excluded);
    }

    #[test]
    fn test_short_copula_needs_context() {
        let filter = MinimumContentFilter::default();
        assert!(verdict(&filter, "It is unconstitutional.").excluded);

        let before = "The new border bill lets agents detain anyone without a warrant.";
        let v = verdict_with_context(&filter, "It is unconstitutional.", before);
        assert!(!v.excluded);
        assert_eq!(v.reason, "short-copula-with-context");
    }

    #[test]
    fn test_filler_lead() {
        let filter = MinimumContentFilter::default();
        let v = verdict(&filter, "you know the economy has really been struggling lately");
        assert_eq!(v.reason, "Filler lead-in with insufficient content");
    }

    #[test]
    fn test_content_words() {
        let filter = MinimumContentFilter::default();
        let v = verdict(&filter, "And it is up to you and me and them.");
        assert!(v.excluded);
        assert!(v.reason.starts_with("Too few content words"));
    }

    #[test]
    fn test_predicate_required() {
        let filter = MinimumContentFilter::default();
        let v = verdict(&filter, "Great stuff overall about these many strong new reforms lately.");
        assert_eq!(v.reason, "No predicate signal");
        assert!(!verdict(&filter, "Wages across every region increased sharply over several years.").excluded);
    }

    #[test]
    fn test_irregular_past_counts_as_predicate() {
        let filter = MinimumContentFilter::default();
        for text in [
            "Unemployment fell to 3.5% in 2019.",
            "Prices rose 30% last year.",
            "Texas lost 40,000 jobs in 2020.",
            "Wages grew 3% last year.",
            "The plan cut taxes by 10% in 2017.",
            "Inflation hit 9% in 2022.",
        ] {
            let v = verdict(&filter, text);
            assert!(!v.excluded, "{}: {}", text, v.reason);
        }
    }
}
