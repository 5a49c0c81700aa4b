use std::sync::LazyLock;

use regex::Regex;

use super::{ClaimFilter, FilterInput};
use crate::error::Result;
use crate::heuristics::PROPER_PHRASE;
use crate::models::FilterVerdict;

/// Self-introductions; the name itself must be capitalized.
static INTRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?i:this\s+is)\s+[A-Z][\w'-]+|(?i:i'?m)\s+[A-Z][\w'-]+\s+(?i:your|the)\s+\w+|(?i:welcome\s+back\s+to))\b",
    )
    .expect("valid intro regex")
});

static SHOW_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:let'?s\s+get\s+back\s+to\s+(?:the\s+)?show|thanks\s+for\s+watching|check\s+it\s+out|subscribe|rate\s+and\s+review)\b",
    )
    .expect("valid show meta regex")
});

static PLEASANTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:thank\s+you(?:\s+very\s+much)?|thanks(?:\s+so\s+much)?|it'?s\s+great\s+to\s+be\s+here|welcome\s+back)\b",
    )
    .expect("valid pleasantry regex")
});

static PREDICATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:is|are|was|were|has|have|had|does|did|do|can|could|should|would|may|might|must)\b")
        .expect("valid predicate regex")
});

/// Show intros and outros, show-control lines and pleasantries.
#[derive(Debug, Clone, Default)]
pub struct ShowIntroFilter;

impl ShowIntroFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ClaimFilter for ShowIntroFilter {
    fn name(&self) -> &'static str {
        "show_intro"
    }

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict> {
        let text = input.require_text(self.name())?;
        let lower = input.lower();

        if !(INTRO.is_match(text) || SHOW_META.is_match(&lower) || PLEASANTRY.is_match(&lower)) {
            return Ok(FilterVerdict::keep());
        }
        // a real proposition about a named entity can still open with one
        if PREDICATE.is_match(&lower) && PROPER_PHRASE.is_match(text) {
            return Ok(FilterVerdict::rescued(self.name(), "Named-entity proposition"));
        }
        Ok(FilterVerdict::exclude(self.name(), "Show intro/meta/pleasantry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::verdict;

    #[test]
    fn test_intros_and_pleasantries() {
        for text in [
            "Thank you very much for having me tonight everyone.",
            "I'm Sarah your host for the evening debate.",
            "Welcome back to the second half of our debate.",
            "Please like and subscribe to the channel below.",
        ] {
            let v = verdict(&ShowIntroFilter, text);
            assert!(v.excluded, "{}", text);
            assert_eq!(v.filter, "show_intro");
        }
    }

    #[test]
    fn test_lowercase_this_is_not_an_intro() {
        assert!(!verdict(&ShowIntroFilter, "This is a problem for every family.").excluded);
    }

    #[test]
    fn test_named_entity_rescue() {
        let v = verdict(&ShowIntroFilter, "Thanks to Federal Reserve policy, rates were cut twice.");
        assert!(!v.excluded);
        assert_eq!(v.reason, "Named-entity proposition");
    }
}
