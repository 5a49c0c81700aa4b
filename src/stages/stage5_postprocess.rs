use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::FilteredClaims;
use crate::models::{Claim, ClaimAnnotation, ClaimCore, ClassifiedSentence, Diagnostics, Span};

/// Configuration for deduplication, merging and context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    /// Overlap share (of the claim or of the cluster) that joins a cluster
    pub overlap_threshold: f64,
    /// Same-turn sentences of context on each side
    pub context_sentences: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.5,
            context_sentences: 2,
        }
    }
}

/// A claim core with the annotation the classifier attached to it.
#[derive(Debug, Clone)]
struct Annotated {
    core: ClaimCore,
    annotation: ClaimAnnotation,
}

/// Deduplicate, merge overlapping claims, attach context and order the
/// result by span start, then type priority, then id.
pub fn postprocess(
    filtered: FilteredClaims,
    sentences: &[ClassifiedSentence],
    config: &PostprocessConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<Claim> {
    let FilteredClaims { claims, mut annotations } = filtered;
    let mut annotated = Vec::with_capacity(claims.len());
    for core in claims {
        match annotations.remove(&core.id) {
            Some(annotation) => annotated.push(Annotated { core, annotation }),
            None => warn!("Claim {} has no annotation; dropping it", core.id),
        }
    }

    let unique = remove_duplicates(annotated, diagnostics);
    let merged = merge_overlapping(unique, config.overlap_threshold, diagnostics);

    let contexts = ContextWindow::new(sentences, config.context_sentences);
    let mut claims: Vec<Claim> = merged
        .into_iter()
        .map(|a| {
            let context = contexts.around(&a.core.sentence_id);
            Claim::assemble(a.core, a.annotation, context)
        })
        .collect();

    claims.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| b.claim_type.priority().cmp(&a.claim_type.priority()))
            .then_with(|| a.id.cmp(&b.id))
    });

    diagnostics.final_claims = claims.len();
    info!(
        "Post-processing complete: {} duplicates removed, {} merges, {} final claims",
        diagnostics.duplicates_removed,
        diagnostics.merges,
        claims.len()
    );
    claims
}

/// Collapse claims with identical (normalized text, speaker, sentence, type).
fn remove_duplicates(claims: Vec<Annotated>, diagnostics: &mut Diagnostics) -> Vec<Annotated> {
    let mut seen = HashSet::new();
    let before = claims.len();

    let unique: Vec<Annotated> = claims
        .into_iter()
        .filter(|a| {
            seen.insert((
                a.core.text.trim().to_lowercase(),
                a.core.speaker.clone(),
                a.core.sentence_id.clone(),
                a.annotation.claim_type,
            ))
        })
        .collect();

    diagnostics.duplicates_removed += before - unique.len();
    unique
}

fn merge_overlapping(claims: Vec<Annotated>, threshold: f64, diagnostics: &mut Diagnostics) -> Vec<Annotated> {
    // BTreeMap keeps group order independent of hashing
    let mut groups: BTreeMap<(String, String), Vec<Annotated>> = BTreeMap::new();
    for claim in claims {
        groups
            .entry((claim.core.sentence_id.clone(), claim.core.speaker.clone()))
            .or_default()
            .push(claim);
    }

    let mut merged = Vec::new();
    for (_, mut group) in groups {
        group.sort_by_key(|a| (a.core.span.start, a.core.span.end));

        let mut clusters: Vec<Vec<Annotated>> = Vec::new();
        for claim in group {
            let joins = clusters
                .last()
                .is_some_and(|cluster| joins_cluster(cluster, &claim.core.span, threshold));
            match clusters.last_mut() {
                Some(cluster) if joins => cluster.push(claim),
                _ => clusters.push(vec![claim]),
            }
        }

        for cluster in clusters {
            if cluster.len() > 1 {
                diagnostics.merges += 1;
            }
            merged.extend(merge_cluster(cluster));
        }
    }
    merged
}

fn cluster_span(cluster: &[Annotated]) -> Option<Span> {
    cluster
        .iter()
        .map(|a| a.core.span)
        .reduce(|acc, span| acc.union(&span))
}

/// Whether `span` overlaps the cluster by more than `threshold` of its own
/// length or of the cluster's length.
fn joins_cluster(cluster: &[Annotated], span: &Span, threshold: f64) -> bool {
    let Some(extent) = cluster_span(cluster) else {
        return false;
    };
    let overlap = extent.overlap(span);
    if overlap == 0 {
        return false;
    }
    let overlap = overlap as f64;
    overlap / span.len().max(1) as f64 > threshold || overlap / extent.len().max(1) as f64 > threshold
}

/// One claim from a cluster: identity from the most confident member, the
/// union of spans, the highest-priority type and the mean confidence.
fn merge_cluster(cluster: Vec<Annotated>) -> Option<Annotated> {
    let size = cluster.len();
    let confidence = cluster.iter().map(|a| a.core.confidence).sum::<f64>() / size.max(1) as f64;
    let span = cluster_span(&cluster);
    let annotation = cluster
        .iter()
        .map(|a| &a.annotation)
        .reduce(|best, a| if a.claim_type.priority() > best.claim_type.priority() { a } else { best })
        .cloned();

    let mut members = cluster.into_iter();
    let first = members.next()?;
    let mut merged = members.fold(first, |best, a| if a.core.confidence > best.core.confidence { a } else { best });
    if size == 1 {
        return Some(merged);
    }

    if let Some(span) = span {
        merged.core.span = span;
    }
    if let Some(annotation) = annotation {
        merged.annotation = annotation;
    }
    merged.core.confidence = confidence;
    debug!(
        "Merged {} claims in {} into {} ({})",
        size, merged.core.sentence_id, merged.core.id, merged.annotation.claim_type
    );
    Some(merged)
}

/// Neighboring same-turn sentences around a claim's sentence.
struct ContextWindow<'s> {
    by_turn: HashMap<&'s str, Vec<&'s ClassifiedSentence>>,
    position: HashMap<&'s str, (&'s str, usize)>,
    radius: usize,
}

impl<'s> ContextWindow<'s> {
    fn new(sentences: &'s [ClassifiedSentence], radius: usize) -> Self {
        let mut by_turn: HashMap<&str, Vec<&ClassifiedSentence>> = HashMap::new();
        for sentence in sentences {
            by_turn.entry(sentence.turn_id.as_str()).or_default().push(sentence);
        }

        let mut position: HashMap<&'s str, (&'s str, usize)> = HashMap::new();
        for (&turn_id, turn_sentences) in by_turn.iter_mut() {
            turn_sentences.sort_by_key(|s| s.index_in_turn);
            for (i, &sentence) in turn_sentences.iter().enumerate() {
                position.insert(sentence.id.as_str(), (turn_id, i));
            }
        }

        Self {
            by_turn,
            position,
            radius,
        }
    }

    fn around(&self, sentence_id: &str) -> String {
        let Some(&(turn_id, idx)) = self.position.get(sentence_id) else {
            warn!("No sentence {} for claim context", sentence_id);
            return String::new();
        };
        let Some(turn_sentences) = self.by_turn.get(turn_id) else {
            return String::new();
        };
        let start = idx.saturating_sub(self.radius);
        let end = (idx + self.radius + 1).min(turn_sentences.len());

        turn_sentences[start..end]
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
