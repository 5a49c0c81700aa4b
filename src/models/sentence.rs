use std::fmt;

use serde::{Deserialize, Serialize};

use super::Span;

/// Grammatical type assigned by the sentence classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentenceType {
    Statement,
    Question,
    Exclamation,
    Imperative,
    Fragment,
}

impl SentenceType {
    pub const ALL: [SentenceType; 5] = [
        SentenceType::Statement,
        SentenceType::Question,
        SentenceType::Exclamation,
        SentenceType::Imperative,
        SentenceType::Fragment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceType::Statement => "statement",
            SentenceType::Question => "question",
            SentenceType::Exclamation => "exclamation",
            SentenceType::Imperative => "imperative",
            SentenceType::Fragment => "fragment",
        }
    }
}

impl fmt::Display for SentenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sentence inside a turn, typed and ready for gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSentence {
    /// `{turn_id}_s{index}`
    pub id: String,
    pub text: String,
    pub span: Span,
    pub turn_id: String,
    pub speaker: String,
    pub index_in_turn: usize,
    pub sentence_type: SentenceType,
    pub type_confidence: f64,
    pub needs_repair: bool,
    pub repair_reason: Option<String>,
}

impl ClassifiedSentence {
    pub fn make_id(turn_id: &str, index: usize) -> String {
        format!("{}_s{:03}", turn_id, index)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
impl ClassifiedSentence {
    /// A statement covering `text` at offset 0 of a one-sentence turn.
    pub(crate) fn statement(text: &str) -> Self {
        Self {
            id: ClassifiedSentence::make_id("turn_0000", 0),
            text: text.to_string(),
            span: Span::new(0, text.len()),
            turn_id: "turn_0000".to_string(),
            speaker: "ALICE".to_string(),
            index_in_turn: 0,
            sentence_type: SentenceType::Statement,
            type_confidence: 0.9,
            needs_repair: false,
            repair_reason: None,
        }
    }
}
