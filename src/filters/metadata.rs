use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::models::FilterVerdict;

static REPORTING_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:argues?|shows?|found|finds|demonstrat(?:es|ed|ing)|reports?|claims?)\b")
        .expect("valid reporting verb regex")
});

/// Three or more capitalized words, optionally followed by a subtitle.
static TITLE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][\w'\u{2019}-]+(?:\s+[A-Z][\w'\u{2019}-]+){2,}(?:\s*[\u{2014}:,-].*)?$")
        .expect("valid title regex")
});

static ANY_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:is|are|was|were|has|have|had|does|did|do|be|being|been|[a-z]+ed|[a-z]+ing|[a-z]+s)\b")
        .expect("valid verb regex")
});

static RHETORICAL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(?:what'?s|who'?s|where'?s|when'?s|how'?s)\b",
        r"^do you remember\b",
        r"^(?:can|could|would|should)\s+you\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid rhetorical regex"))
    .collect()
});

/// Titles and labels without a predicate, and rhetorical meta questions.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter;

impl MetadataFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for MetadataFilter {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();

        if REPORTING_VERB.is_match(&lower) {
            return Ok(FilterVerdict::keep());
        }
        if TITLE_LIKE.is_match(text) && !ANY_VERB.is_match(&lower) {
            return Ok(FilterVerdict::exclude(self.name(), "Title/label without predicate"));
        }
        if text.ends_with('?') && RHETORICAL.iter().any(|p| p.is_match(&lower)) {
            return Ok(FilterVerdict::exclude(self.name(), "Rhetorical/meta question"));
        }
        Ok(FilterVerdict::keep())
    }
}
