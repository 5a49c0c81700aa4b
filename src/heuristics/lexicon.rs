//! Word lists and patterns shared by the classifier, detectors and filters.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Domain terms that anchor an otherwise short claim.
pub const DEFAULT_ANCHOR_TERMS: &[&str] = &[
    "senate",
    "house",
    "congress",
    "constitution",
    "federal",
    "state",
    "country",
    "dei",
    "doj",
    "epa",
    "opec",
    "oecd",
    "nato",
    "cdc",
];

/// Spoken filler, counted when judging whether a sentence is mostly noise.
pub const FILLER_WORDS: &[&str] = &[
    "um", "umm", "uh", "uhh", "erm", "like", "yeah", "right", "well", "so", "okay", "ok", "mhm",
    "hmm",
];

pub const COORDINATING_CONJUNCTIONS: &[&str] = &["and", "but", "or", "so", "nor", "yet"];

pub const SUBORDINATING_CONJUNCTIONS: &[&str] = &[
    "because", "since", "although", "though", "while", "if", "when", "after", "before", "unless",
    "whereas",
];

pub static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid digit regex"));

pub static MONEY_OR_PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[$€£]\s*\d|\d+(?:\.\d+)?\s*%|\d+(?:\.\d+)?\s+percent\b)")
        .expect("valid money regex")
});

/// Two or more consecutive capitalized words ("Supreme Court").
pub static PROPER_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+").expect("valid proper phrase regex")
});

static ANCHOR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_-]*").expect("valid token regex"));

/// Finite-verb evidence: copula, auxiliaries, modals, regular past and
/// third-person forms.
pub static FINITE_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:is|are|was|were|am|has|have|had|does|do|did|can|could|will|would|shall|should|may|might|must|\w+ed|\w+s)\b|\b\w+'(?:s|re|m|ve|d|ll)\b",
    )
    .expect("valid finite verb regex")
});

/// Common irregular past forms the suffix rule misses.
pub const IRREGULAR_PAST: &[&str] = &[
    "said", "went", "got", "made", "took", "came", "saw", "knew", "thought", "told", "found",
    "gave", "left", "felt", "became", "began", "brought", "bought", "built", "fell", "grew",
    "held", "kept", "lost", "met", "paid", "ran", "rose", "sent", "spent", "stood", "won", "wrote",
    "hit", "cut", "put", "set", "let", "hurt", "cost", "shut", "quit",
];

/// Anchor detection shared by the content filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    terms: BTreeSet<String>,
}

impl Anchors {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn has_domain_term(&self, text: &str) -> bool {
        !self.terms.is_empty()
            && ANCHOR_TOKEN
                .find_iter(text)
                .any(|m| self.terms.contains(&m.as_str().to_lowercase()))
    }

    /// Digit, currency/percent, multi-word proper phrase or domain term.
    pub fn is_anchored(&self, text: &str) -> bool {
        has_external_anchor(text) || self.has_domain_term(text)
    }
}

impl Default for Anchors {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_TERMS)
    }
}

/// Digit, currency/percent or proper phrase, without the domain terms.
pub fn has_external_anchor(text: &str) -> bool {
    DIGIT.is_match(text) || MONEY_OR_PERCENT.is_match(text) || PROPER_PHRASE.is_match(text)
}

/// Whole-word, case-insensitive match of a (possibly multi-word) term.
/// `haystack` must already be lowercase.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + term.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Number of distinct terms from `terms` present in lowercase `haystack`.
pub fn count_terms(haystack: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| contains_term(haystack, t)).count()
}

/// Terms from `terms` present in lowercase `haystack`.
pub fn matched_terms<'t>(haystack: &str, terms: &[&'t str]) -> Vec<&'t str> {
    terms
        .iter()
        .copied()
        .filter(|t| contains_term(haystack, t))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercase words with surrounding punctuation removed.
pub fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn first_word(text: &str) -> Option<String> {
    words(text).into_iter().next()
}

pub fn has_finite_verb(text: &str) -> bool {
    if FINITE_VERB.is_match(text) {
        return true;
    }
    has_irregular_past(&text.to_lowercase())
}

/// `lower` must already be lowercase.
pub fn has_irregular_past(lower: &str) -> bool {
    IRREGULAR_PAST.iter().any(|v| contains_term(lower, v))
}

pub fn ends_with_terminal(text: &str) -> bool {
    text.trim_end()
        .trim_end_matches(['"', '\'', ')', ']', '\u{201d}'])
        .ends_with(['.', '!', '?'])
}

/// Share of words that are spoken filler.
pub fn filler_ratio(text: &str) -> f64 {
    let words = words(text);
    if words.is_empty() {
        return 0.0;
    }
    let filler = words
        .iter()
        .filter(|w| FILLER_WORDS.contains(&w.as_str()))
        .count();
    filler as f64 / words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("it is here", "is"));
        assert!(!contains_term("this here", "is"));
        assert!(contains_term("due to rain", "due to"));
        assert!(!contains_term("uncertainty", "certainty"));
        assert!(contains_term("results in.", "results in"));
    }

    #[test]
    fn test_anchors() {
        let anchors = Anchors::default();
        assert!(anchors.is_anchored("cost taxpayers $22 billion"));
        assert!(anchors.is_anchored("it was 40% higher"));
        assert!(anchors.is_anchored("the Supreme Court ruled"));
        assert!(anchors.is_anchored("the senate voted"));
        assert!(!anchors.is_anchored("The program has cost taxpayers."));
    }

    #[test]
    fn test_finite_verb() {
        assert!(has_finite_verb("there is randomness"));
        assert!(has_finite_verb("she went home"));
        assert!(has_finite_verb("Inflation hit 9% in 2022."));
        assert!(has_finite_verb("it's built in"));
        assert!(!has_finite_verb("yeah"));
        assert!(!has_finite_verb("the big blue one"));
    }

    #[test]
    fn test_terminal_and_filler() {
        assert!(ends_with_terminal("Really?\""));
        assert!(!ends_with_terminal("and then"));
        assert!(filler_ratio("um uh yeah well okay") > 0.9);
        assert_eq!(filler_ratio(""), 0.0);
    }
}
