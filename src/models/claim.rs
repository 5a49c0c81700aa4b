use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClassifiedSentence, Span};

/// Kind of claim a detector recognized, or `Normative` once the classifier
/// has decided it is a value judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Factual,
    Statistical,
    Causal,
    Comparative,
    Historical,
    Normative,
}

impl ClaimType {
    /// Merge priority; the higher value wins when overlapping claims collapse.
    pub fn priority(&self) -> u8 {
        match self {
            ClaimType::Statistical => 5,
            ClaimType::Causal => 4,
            ClaimType::Comparative => 3,
            ClaimType::Historical => 2,
            ClaimType::Factual => 1,
            ClaimType::Normative => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Factual => "factual",
            ClaimType::Statistical => "statistical",
            ClaimType::Causal => "causal",
            ClaimType::Comparative => "comparative",
            ClaimType::Historical => "historical",
            ClaimType::Normative => "normative",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a detector emits. Immutable except for the span union applied by
/// the merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimCore {
    pub id: String,
    /// Type as detected, before classification
    pub claim_type: ClaimType,
    pub text: String,
    pub speaker: String,
    pub span: Span,
    pub sentence_id: String,
    pub turn_id: String,
    pub confidence: f64,
}

impl ClaimCore {
    /// New claim covering the whole sentence, with a fresh id.
    pub fn from_sentence(sentence: &ClassifiedSentence, claim_type: ClaimType, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            claim_type,
            text: sentence.text.trim().to_string(),
            speaker: sentence.speaker.clone(),
            span: sentence.span,
            sentence_id: sentence.id.clone(),
            turn_id: sentence.turn_id.clone(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Classification result attached to a claim by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAnnotation {
    pub claim_type: ClaimType,
    pub should_fact_check: bool,
    pub classification_reason: String,
}

/// A final, context-enriched claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub text: String,
    pub speaker: String,
    pub span: Span,
    pub sentence_id: String,
    pub turn_id: String,
    pub confidence: f64,
    pub context: String,
    pub should_fact_check: bool,
    pub classification_reason: String,
}

impl Claim {
    pub fn assemble(core: ClaimCore, annotation: ClaimAnnotation, context: String) -> Self {
        Self {
            id: core.id,
            claim_type: annotation.claim_type,
            text: core.text,
            speaker: core.speaker,
            span: core.span,
            sentence_id: core.sentence_id,
            turn_id: core.turn_id,
            confidence: core.confidence,
            context,
            should_fact_check: annotation.should_fact_check,
            classification_reason: annotation.classification_reason,
        }
    }

    pub fn fact_check_request(&self) -> FactCheckRequest {
        FactCheckRequest {
            id: self.id.clone(),
            text: self.text.clone(),
            should_fact_check: self.should_fact_check,
        }
    }

    pub fn fallacy_request(&self) -> FallacyRequest {
        FallacyRequest {
            id: self.id.clone(),
            text: self.text.clone(),
            speaker: self.speaker.clone(),
            span: self.span,
            context: self.context.clone(),
        }
    }
}

/// Outcome of one filter over one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterVerdict {
    pub excluded: bool,
    pub reason: String,
    /// Name of the filter that decided
    pub filter: String,
}

impl FilterVerdict {
    pub fn keep() -> Self {
        Self {
            excluded: false,
            reason: String::new(),
            filter: String::new(),
        }
    }

    pub fn exclude(filter: &str, reason: impl Into<String>) -> Self {
        Self {
            excluded: true,
            reason: reason.into(),
            filter: filter.to_string(),
        }
    }

    /// A pass that still records why (e.g. a rescue).
    pub fn rescued(filter: &str, reason: impl Into<String>) -> Self {
        Self {
            excluded: false,
            reason: reason.into(),
            filter: filter.to_string(),
        }
    }
}

/// What the fact-verification collaborator receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckRequest {
    pub id: String,
    pub text: String,
    pub should_fact_check: bool,
}

/// What the fallacy detector receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallacyRequest {
    pub id: String,
    pub text: String,
    pub speaker: String,
    pub span: Span,
    pub context: String,
}
