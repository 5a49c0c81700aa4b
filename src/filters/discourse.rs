use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::heuristics::{DIGIT, MONEY_OR_PERCENT};
use crate::models::FilterVerdict;

/// Two capitalized words anywhere; a cheap proper-noun proxy.
static TWO_CAPITALIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+\b.*\b[A-Z][a-z]+\b").expect("valid capitalized regex")
});

static MARKER_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:well|so|but|and|or|now|then)\b").expect("valid marker lead regex")
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid discourse regex"))
        .collect()
}

static DISCOURSE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(?:i\s+think|i\s+feel|i\s+believe)\b.*\b(?:i\s+think|i\s+feel|i\s+believe)\b",
        r"^(?:so|but|and)\b.{5,50}\b(?:and|but|so)\s*$",
        r"^(?:well|so|but)\b.{5,40}\b(?:though|anyway)\s*$",
    ])
});

static INCOMPLETE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:and|but|or|so)\s*$",
        r"^(?:he|she|it|they|this|that)\s+(?:was|were|is|are)\s+\w+\s*$",
        r"^it's\s+(?:not\s+that\s+)?\w+\s*$",
        r"^(?:so|and|but)\s+(?:you|i|we)\s+(?:skip|jump|go)\b",
    ])
});

static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(?:well|so|but|and|or)\b.*\b(?:i\s+think|i\s+mean|you\s+know)\b",
        r"\b(?:we|i|you)\s+(?:have|had|got)\s+a\s+lot\s+of\s+catching\s+up\b",
        r"^(?:and|so)\s+i\s+got\s+to\s+tell\s+(?:him|her|you)\b",
    ])
});

/// Speaker-change hints inside one unpunctuated run.
static PRONOUN_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:i|we|you|i'm|we're|you're)\b").expect("valid pronoun boundary regex")
});

const MIN_WORDS: usize = 6;
/// Marker-led sentences longer than this are left to the later filters.
const MARKER_LEAD_MAX_TOKENS: usize = 12;
const INCOMPLETE_MAX_WORDS: usize = 8;
const RUN_ON_MIN_WORDS: usize = 15;

/// Discourse fragments, incomplete clauses and conversational noise.
#[derive(Debug, Clone, Default)]
pub struct DiscourseFragmentFilter;

impl DiscourseFragmentFilter {
    pub fn new() -> Self {
        Self
    }
}

fn likely_anchor(text: &str) -> bool {
    DIGIT.is_match(text) || MONEY_OR_PERCENT.is_match(text) || TWO_CAPITALIZED.is_match(text)
}

impl ClaimFilter for DiscourseFragmentFilter {
    fn name(&self) -> &'static str {
        "discourse_fragment"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();
        let bare = lower.trim_end_matches(['.', '!', '?']).trim_end();
        let words = input.token_count();
        let anchored = likely_anchor(text);

        if words < MIN_WORDS && !anchored {
            return Ok(FilterVerdict::exclude(self.name(), "Fragment/too short"));
        }
        if !anchored {
            if words <= MARKER_LEAD_MAX_TOKENS && MARKER_LEAD.is_match(bare) {
                return Ok(FilterVerdict::exclude(self.name(), "Discourse fragment: marker lead"));
            }
            if DISCOURSE_PATTERNS.iter().any(|p| p.is_match(bare)) {
                return Ok(FilterVerdict::exclude(self.name(), "Discourse fragment"));
            }
            if words <= INCOMPLETE_MAX_WORDS && INCOMPLETE_PATTERNS.iter().any(|p| p.is_match(bare)) {
                return Ok(FilterVerdict::exclude(self.name(), "Incomplete sentence"));
            }
            if NOISE_PATTERNS.iter().any(|p| p.is_match(bare)) {
                return Ok(FilterVerdict::exclude(self.name(), "Conversational noise"));
            }
        }
        if words > RUN_ON_MIN_WORDS && !text.contains(['.', '!', '?', ';', ':']) {
            let boundaries = PRONOUN_BOUNDARY.find_iter(bare).count();
            if boundaries >= 2 {
                return Ok(FilterVerdict::exclude(
                    self.name(),
                    format!(
                        "Multiple sentence fragments without punctuation ({} boundaries)",
                        boundaries
                    ),
                ));
            }
        }
        Ok(FilterVerdict::keep())
    }
}
