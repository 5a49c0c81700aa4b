//! Ordered exclusion filters and the factual-vs-normative classifier.
//!
//! The chain runs each candidate claim through the filters in a fixed order;
//! the first exclusion wins. A filter may also pass a claim with a reason
//! (a rescue), which only waives that one filter. Every filter but the
//! sponsor detector is a pure function of its [`FilterInput`]; the sponsor
//! detector threads an explicit [`SponsorState`] owned by the caller.

pub mod biographical;
pub mod classify;
pub mod content;
pub mod conversational;
pub mod discourse;
pub mod legacy;
pub mod metadata;
pub mod pleasantry;
pub mod sponsor;
pub mod truncation;
pub mod vagueness;

pub use biographical::*;
pub use classify::*;
pub use content::*;
pub use conversational::*;
pub use discourse::*;
pub use legacy::*;
pub use metadata::*;
pub use pleasantry::*;
pub use sponsor::*;
pub use truncation::*;
pub use vagueness::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::heuristics::{Anchors, DEFAULT_ANCHOR_TERMS};
use crate::models::{ClaimCore, FilterVerdict};

/// Read-only view of one claim handed to every filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterInput<'a> {
    pub claim: &'a ClaimCore,
    /// Trimmed claim text
    pub text: &'a str,
    /// Preceding same-turn text, at most the configured budget
    pub context_before: &'a str,
    /// Following same-turn text, at most the configured budget
    pub context_after: &'a str,
}

impl<'a> FilterInput<'a> {
    pub fn new(claim: &'a ClaimCore, context_before: &'a str, context_after: &'a str) -> Self {
        Self {
            claim,
            text: claim.text.trim(),
            context_before,
            context_after,
        }
    }

    /// Lowercase text with typographic apostrophes folded to `'`.
    pub fn lower(&self) -> String {
        self.text.to_lowercase().replace('\u{2019}', "'")
    }

    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// The trimmed text, or an error naming `filter` when there is none.
    pub fn require_text(&self, filter: &str) -> Result<&'a str> {
        if self.text.is_empty() {
            return Err(Error::filter(filter, format!("claim {} has no text", self.claim.id)));
        }
        Ok(self.text)
    }
}

/// A stateless exclusion filter.
pub trait ClaimFilter: Send + Sync {
    /// Stable name, used as the diagnostics key.
    fn name(&self) -> &'static str;

    fn evaluate(&self, input: &FilterInput<'_>) -> Result<FilterVerdict>;
}

/// Filter thresholds and switches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Domain terms that count as anchors
    pub anchor_terms: Vec<String>,
    /// Unanchored claims with fewer tokens are excluded
    pub min_tokens_no_anchor: usize,
    /// Unanchored claims with fewer content words are excluded
    pub min_content_words: usize,
    /// Preceding context needed to keep a short "it is X" claim
    pub short_copula_context_chars: usize,
    /// Filler-led claims need at least this many tokens
    pub filler_lead_min_tokens: usize,
    /// Anchored biographical asides need at least this many tokens
    pub biographical_min_tokens: usize,
    /// Budget for context on each side of a claim, in characters
    pub context_window_chars: usize,
    pub drop_questions: bool,
    /// Track multi-sentence sponsor reads
    pub track_sponsor_blocks: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            anchor_terms: DEFAULT_ANCHOR_TERMS.iter().map(|t| t.to_string()).collect(),
            min_tokens_no_anchor: 7,
            min_content_words: 5,
            short_copula_context_chars: 40,
            filler_lead_min_tokens: 12,
            biographical_min_tokens: 9,
            context_window_chars: 300,
            drop_questions: true,
            track_sponsor_blocks: true,
        }
    }
}

/// Result of running the chain over one claim
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    /// The excluding verdict, or a keep
    pub verdict: FilterVerdict,
    /// Filters that passed the claim with a rescue reason
    pub rescues: Vec<FilterVerdict>,
    /// Filters that failed on this claim and were skipped
    pub failures: usize,
}

/// The fixed filter cascade.
pub struct FilterChain {
    sponsor: SponsorFilter,
    filters: Vec<Box<dyn ClaimFilter>>,
    classifier: NormativeClassifier,
}

impl FilterChain {
    pub fn new(config: &FilterConfig) -> Self {
        let anchors = Anchors::new(&config.anchor_terms);
        let filters: Vec<Box<dyn ClaimFilter>> = vec![
            Box::new(ConversationalFilter::new()),
            Box::new(MetadataFilter::new()),
            Box::new(MinimumContentFilter::new(config, anchors)),
            Box::new(ShowIntroFilter::new()),
            Box::new(BiographicalFilter::new(config.biographical_min_tokens)),
            Box::new(TruncationFilter::new()),
            Box::new(VaguePronounFilter::new()),
            Box::new(DiscourseFragmentFilter::new()),
            Box::new(QuestionFilter::new(config.drop_questions)),
            Box::new(HypotheticalFilter::new()),
            Box::new(MangledTextFilter::new()),
        ];

        info!("Initialized claim filter chain with {} filters", filters.len() + 1);

        Self {
            sponsor: SponsorFilter::new(config.track_sponsor_blocks),
            filters,
            classifier: NormativeClassifier::new(),
        }
    }

    /// Filter names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        std::iter::once(self.sponsor.name())
            .chain(self.filters.iter().map(|f| f.name()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn classifier(&self) -> &NormativeClassifier {
        &self.classifier
    }

    /// Run the cascade; the first exclusion short-circuits.
    pub fn evaluate(&self, input: &FilterInput<'_>, state: &mut SponsorState) -> ChainOutcome {
        let mut outcome = ChainOutcome {
            verdict: FilterVerdict::keep(),
            rescues: Vec::new(),
            failures: 0,
        };

        let sponsor = self.sponsor.evaluate(input, state);
        let rest = self.filters.iter().map(|f| (f.name(), f.evaluate(input)));

        for (name, result) in std::iter::once((self.sponsor.name(), sponsor)).chain(rest) {
            match result {
                Ok(verdict) if verdict.excluded => {
                    debug!("{} excluded by {}: {}", input.claim.id, name, verdict.reason);
                    outcome.verdict = verdict;
                    return outcome;
                }
                Ok(verdict) if !verdict.reason.is_empty() => {
                    debug!("{} rescued by {}: {}", input.claim.id, name, verdict.reason);
                    outcome.rescues.push(verdict);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Filter {} failed on {}: {}", name, input.claim.id, e);
                    outcome.failures += 1;
                }
            }
        }
        outcome
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain").field("filters", &self.names()).finish()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{ClaimType, ClassifiedSentence};

    pub fn claim(text: &str) -> ClaimCore {
        ClaimCore::from_sentence(&ClassifiedSentence::statement(text), ClaimType::Factual, 0.5)
    }

    pub fn verdict(filter: &dyn ClaimFilter, text: &str) -> FilterVerdict {
        let claim = claim(text);
        filter.evaluate(&FilterInput::new(&claim, "", "")).unwrap()
    }

    pub fn verdict_with_context(filter: &dyn ClaimFilter, text: &str, before: &str) -> FilterVerdict {
        let claim = claim(text);
        filter.evaluate(&FilterInput::new(&claim, before, "")).unwrap()
    }
}
