use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::heuristics::{ends_with_terminal, DIGIT, PROPER_PHRASE};
use crate::models::FilterVerdict;

static ELLIPSIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.\.\.|\u{2026})\s*$").expect("valid ellipsis regex"));

static LETTER_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{1,3}$").expect("valid tail regex"));

static CONJUNCTION_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:,\s*)?\b(?:and|but|so|or|because)\s*$").expect("valid conjunction tail regex")
});

static FILLER_CONJUNCTION_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:um+|uh+|erm+|you\s+know|i\s+mean|like)\s+(?:and|so|but)\b")
        .expect("valid filler conjunction regex")
});

const SHORT_TAIL_TOKENS: usize = 10;
const FILLER_LEAD_TOKENS: usize = 12;

/// Cut-off sentences and dangling tails the splitter let through.
#[derive(Debug, Clone, Default)]
pub struct TruncationFilter;

impl TruncationFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for TruncationFilter {
    fn name(&self) -> &'static str {
        "truncation"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();
        let tokens = input.token_count();

        if ELLIPSIS.is_match(text) {
            return Ok(FilterVerdict::exclude(self.name(), "Truncated with ellipsis"));
        }
        if tokens <= SHORT_TAIL_TOKENS && LETTER_TAIL.is_match(text) && !ends_with_terminal(text) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                "Truncated mid-word/unfinished tail",
            ));
        }
        if CONJUNCTION_TAIL.is_match(&lower) {
            return Ok(FilterVerdict::exclude(self.name(), "Dangling conjunction tail"));
        }
        let anchored = DIGIT.is_match(text) || PROPER_PHRASE.is_match(text);
        if FILLER_CONJUNCTION_LEAD.is_match(&lower) && tokens < FILLER_LEAD_TOKENS && !anchored {
            return Ok(FilterVerdict::exclude(
                self.name(),
                "Filler/conjunction lead with insufficient content",
            ));
        }
        Ok(FilterVerdict::keep())
    }
}
