use std::sync::LazyLock;

use regex::Regex;

use super::FilterInput;
use crate::error::Result;
use crate::models::FilterVerdict;

static PROMO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:head over to|use (?:the )?exclusive link|use code|sponsored(?: by)?|our partners? at)\b",
        r"https?://",
        r"\bwww\.\S+",
        r"\w\.(?:com|org|net|io|co)\b",
        r"\b(?:save|off)\s*\d{1,3}\s*%",
        r"\b(?:ground\s*news|spotify|apple\s*podcasts?|google\s*podcasts?|patreon|substack)\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).expect("valid promo regex"))
    .collect()
});

static META_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:check it out|i tweeted|i put a link)\b",
        r"\bmultiple ways to ingest\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).expect("valid meta regex"))
    .collect()
});

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:this (?:episode|segment) is (?:brought|sponsored) by|our sponsors?\b)")
        .expect("valid sponsor start regex")
});

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(?:let'?s|get) back to (?:the )?show|and we'?re back)\b")
        .expect("valid sponsor end regex")
});

/// Whether a run is inside a sponsor read, plus the decision for the
/// sentence seen last so every claim from one sentence gets the same answer.
///
/// Owned by the caller and threaded through one document; never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorState {
    pub in_sponsor: bool,
    last_sentence: Option<String>,
    last_reason: Option<&'static str>,
}

impl SponsorState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Promotional reads, links and show-control lines.
#[derive(Debug, Clone)]
pub struct SponsorFilter {
    track_blocks: bool,
}

impl SponsorFilter {
    pub fn new(track_blocks: bool) -> Self {
        Self { track_blocks }
    }

    pub fn name(&self) -> &'static str {
        "sponsor"
    }

    pub fn evaluate(&self, input: &FilterInput<'_>, state: &mut SponsorState) -> Result<FilterVerdict> {
        input.require_text(self.name())?;

        let sentence = &input.claim.sentence_id;
        let reason = if state.last_sentence.as_ref() == Some(sentence) {
            state.last_reason
        } else {
            let reason = self.decide(&input.lower(), state);
            state.last_sentence = Some(sentence.clone());
            state.last_reason = reason;
            reason
        };

        Ok(match reason {
            Some(reason) => FilterVerdict::exclude(self.name(), reason),
            None => FilterVerdict::keep(),
        })
    }

    fn decide(&self, lower: &str, state: &mut SponsorState) -> Option<&'static str> {
        if self.track_blocks {
            if state.in_sponsor {
                if BLOCK_END.is_match(lower) {
                    state.in_sponsor = false;
                    return Some("Sponsor block (ending line)");
                }
                return Some("Sponsor block");
            }
            if BLOCK_START.is_match(lower) {
                state.in_sponsor = true;
                return Some("Sponsor block (starting line)");
            }
        }

        if PROMO_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return Some("Promotional content");
        }
        if META_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return Some("Meta show control");
        }
        None
    }
}
