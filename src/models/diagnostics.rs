use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SentenceType;

/// Longest example text kept per rejection, in characters.
pub const EXAMPLE_TEXT_CHARS: usize = 300;

/// Per-stage counters and a bounded sample of rejected texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// "labeled" or "continuous"
    pub input_mode: String,
    pub utterances_in: usize,
    pub turns_created: usize,
    pub failsafe_splits: usize,
    pub failsafe_fallbacks: usize,
    pub sentences_total: usize,
    pub sentences_by_type: BTreeMap<String, usize>,
    pub repair_candidates: usize,
    pub sentences_gated_out: BTreeMap<String, usize>,
    pub raw_claims: usize,
    pub detector_errors: usize,
    pub claims_filtered_out: BTreeMap<String, usize>,
    pub filter_errors: usize,
    pub rescued: usize,
    pub reclassified: usize,
    pub duplicates_removed: usize,
    pub merges: usize,
    pub final_claims: usize,
    pub span_mismatches: usize,
    /// Example texts per rejection key, capped at `max_examples`
    pub examples: BTreeMap<String, Vec<String>>,
    pub messages: Vec<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    max_examples: usize,
}

impl Diagnostics {
    pub fn new(max_examples: usize) -> Self {
        Self {
            input_mode: String::new(),
            utterances_in: 0,
            turns_created: 0,
            failsafe_splits: 0,
            failsafe_fallbacks: 0,
            sentences_total: 0,
            sentences_by_type: SentenceType::ALL
                .iter()
                .map(|t| (t.as_str().to_string(), 0))
                .collect(),
            repair_candidates: 0,
            sentences_gated_out: BTreeMap::new(),
            raw_claims: 0,
            detector_errors: 0,
            claims_filtered_out: BTreeMap::new(),
            filter_errors: 0,
            rescued: 0,
            reclassified: 0,
            duplicates_removed: 0,
            merges: 0,
            final_claims: 0,
            span_mismatches: 0,
            examples: BTreeMap::new(),
            messages: Vec::new(),
            generated_at: Utc::now(),
            max_examples,
        }
    }

    pub fn count_sentence(&mut self, sentence_type: SentenceType) {
        self.sentences_total += 1;
        *self
            .sentences_by_type
            .entry(sentence_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn count_gated(&mut self, reason: &str, text: &str) {
        *self.sentences_gated_out.entry(reason.to_string()).or_insert(0) += 1;
        self.record_example(&format!("gate:{}", reason), text);
    }

    pub fn count_filtered(&mut self, filter: &str, text: &str) {
        *self.claims_filtered_out.entry(filter.to_string()).or_insert(0) += 1;
        self.record_example(&format!("filter:{}", filter), text);
    }

    /// Keep at most `max_examples` texts per key, each truncated.
    pub fn record_example(&mut self, key: &str, text: &str) {
        let bucket = self.examples.entry(key.to_string()).or_default();
        if bucket.len() < self.max_examples {
            bucket.push(truncate_chars(text.trim(), EXAMPLE_TEXT_CHARS));
        }
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn total_filtered(&self) -> usize {
        self.claims_filtered_out.values().sum()
    }

    pub fn total_gated(&self) -> usize {
        self.sentences_gated_out.values().sum()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(3)
    }
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentence_types_present() {
        let d = Diagnostics::default();
        assert_eq!(d.sentences_by_type.len(), 5);
        assert!(d.sentences_by_type.values().all(|&v| v == 0));
    }

    #[test]
    fn test_examples_are_capped() {
        let mut d = Diagnostics::new(3);
        for i in 0..5 {
            d.count_filtered("conversational_filler", &format!("yeah {}", i));
        }
        assert_eq!(d.claims_filtered_out["conversational_filler"], 5);
        assert_eq!(d.examples["filter:conversational_filler"].len(), 3);
    }

    #[test]
    fn test_examples_are_truncated() {
        let mut d = Diagnostics::new(1);
        let long = "\u{e9}".repeat(400);
        d.record_example("k", &long);
        assert_eq!(d.examples["k"][0].chars().count(), EXAMPLE_TEXT_CHARS);
    }
}
