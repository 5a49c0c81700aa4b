use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::filters::{FilterChain, FilterInput, SponsorState};
use crate::models::{ClaimAnnotation, ClaimCore, ClassifiedSentence, Diagnostics};

/// Claims that survived the chain, with their classification attached by id
#[derive(Debug, Clone, Default)]
pub struct FilteredClaims {
    pub claims: Vec<ClaimCore>,
    pub annotations: BTreeMap<String, ClaimAnnotation>,
}

/// Same-turn text around a sentence, for the filters that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    pub before: String,
    pub after: String,
}

/// Builds [`FilterContext`] from the segmented sentences of one document.
#[derive(Debug)]
pub struct ContextIndex<'s> {
    sentences: &'s [ClassifiedSentence],
    positions: HashMap<&'s str, usize>,
    budget_chars: usize,
}

impl<'s> ContextIndex<'s> {
    pub fn new(sentences: &'s [ClassifiedSentence], budget_chars: usize) -> Self {
        Self {
            sentences,
            positions: sentences
                .iter()
                .enumerate()
                .map(|(i, s)| (s.id.as_str(), i))
                .collect(),
            budget_chars,
        }
    }

    /// Context for the sentence with `sentence_id`, empty when unknown.
    pub fn context(&self, sentence_id: &str) -> FilterContext {
        let Some(&pos) = self.positions.get(sentence_id) else {
            return FilterContext::default();
        };
        let turn_id = &self.sentences[pos].turn_id;

        let before: Vec<&str> = self.sentences[..pos]
            .iter()
            .rev()
            .take_while(|s| &s.turn_id == turn_id)
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let after: Vec<&str> = self.sentences[pos + 1..]
            .iter()
            .take_while(|s| &s.turn_id == turn_id)
            .map(|s| s.text.as_str())
            .collect();

        FilterContext {
            before: tail_chars(&before.join(" "), self.budget_chars).to_string(),
            after: head_chars(&after.join(" "), self.budget_chars).to_string(),
        }
    }
}

fn head_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn tail_chars(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    match text.char_indices().nth(count - max_chars) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Run every claim through the chain, then classify the survivors.
///
/// `state` carries the sponsor-block flag across the claims of one document.
pub fn filter_claims(
    claims: Vec<ClaimCore>,
    contexts: &ContextIndex<'_>,
    chain: &FilterChain,
    state: &mut SponsorState,
    diagnostics: &mut Diagnostics,
) -> FilteredClaims {
    let total = claims.len();
    let mut kept = FilteredClaims::default();

    for claim in claims {
        let context = contexts.context(&claim.sentence_id);
        let input = FilterInput::new(&claim, &context.before, &context.after);
        let outcome = chain.evaluate(&input, state);

        diagnostics.filter_errors += outcome.failures;
        diagnostics.rescued += outcome.rescues.len();
        for rescue in &outcome.rescues {
            diagnostics.record_example(&format!("rescue:{}", rescue.filter), &claim.text);
        }

        if outcome.verdict.excluded {
            diagnostics.count_filtered(&outcome.verdict.filter, &claim.text);
            continue;
        }

        let annotation = chain.classifier().classify(&claim);
        if annotation.claim_type != claim.claim_type {
            debug!(
                "Reclassified {} from {} to {}",
                claim.id, claim.claim_type, annotation.claim_type
            );
            diagnostics.reclassified += 1;
        }
        kept.annotations.insert(claim.id.clone(), annotation);
        kept.claims.push(claim);
    }

    info!(
        "Claim filtering: {} in, {} excluded, {} reclassified, {} kept",
        total,
        total - kept.claims.len(),
        diagnostics.reclassified,
        kept.claims.len()
    );
    kept
}
