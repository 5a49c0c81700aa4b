use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::heuristics::has_external_anchor;
use crate::models::FilterVerdict;

static BIO_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*i\s+(?:was|am|went|met|vot(?:ed|e)|graduat(?:ed|e)|remember|think|feel|believe|told|got|said|tweet(?:ed)?|posted)\b",
    )
    .expect("valid biographical start regex")
});

static MEMORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:i\s+remember|i\s+recall|it\s+was\s+the\b.*(?:year|month))")
        .expect("valid memory regex")
});

/// First-person anecdotes and asides.
///
/// Kept only when the aside also carries an external anchor and is long
/// enough to say something beyond the speaker.
#[derive(Debug, Clone)]
pub struct BiographicalFilter {
    min_tokens: usize,
}

impl BiographicalFilter {
    pub fn new(min_tokens: usize) -> Self {
        Self { min_tokens }
    }
}

impl Default for BiographicalFilter {
    fn default() -> Self {
        Self::new(9)
    }
}

impl ClaimFilter for BiographicalFilter {
    fn name(&self) -> &'static str {
        "biographical"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();

        if !(BIO_START.is_match(&lower) || MEMORY.is_match(&lower)) {
            return Ok(FilterVerdict::keep());
        }
        if has_external_anchor(text) && input.token_count() >= self.min_tokens {
            return Ok(FilterVerdict::rescued(self.name(), "Anchored first-person claim"));
        }
        Ok(FilterVerdict::exclude(
            self.name(),
            "First-person biographical aside",
        ))
    }
}
