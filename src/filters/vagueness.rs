use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::models::FilterVerdict;

static VAGUE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:he|she|they|this|that|it)\s+(?:was|were|is|are|did|does|had|has)\b")
        .expect("valid vague start regex")
});

static CONCRETE_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:museum|university|book|study|research|evidence|data|theory|law|principle|discovery|invention|species|planet|element|molecule|gene|protein|disease|medication|treatment|country|city|war|battle|treaty|constitution|government|president|minister|company|product|technology|computer|internet|website|database|algorithm)\b",
    )
    .expect("valid concrete noun regex")
});

/// Pronoun-led claims with nothing concrete to check.
#[derive(Debug, Clone, Default)]
pub struct VaguePronounFilter;

impl VaguePronounFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for VaguePronounFilter {
    fn name(&self) -> &'static str {
        "vague_pronoun"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        input.require_text(self.name())?;
        let lower = input.lower();

        if VAGUE_START.is_match(&lower) && !CONCRETE_NOUN.is_match(&lower) {
            return Ok(FilterVerdict::exclude(
                self.name(),
                "Vague pronoun reference without concrete content",
            ));
        }
        Ok(FilterVerdict::keep())
    }
}
