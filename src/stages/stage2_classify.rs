use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::split_sentences;
use crate::heuristics::{
    ends_with_terminal, filler_ratio, first_word, has_finite_verb, words, WeightedSignals,
    COORDINATING_CONJUNCTIONS, SUBORDINATING_CONJUNCTIONS,
};
use crate::models::{normalize_whitespace, ClassifiedSentence, Diagnostics, SentenceType, Turn};

const IMPERATIVE_OPENERS: &[&str] = &[
    "consider", "imagine", "think", "look", "listen", "remember", "note", "see", "let's", "don't",
    "never", "please", "stop", "tell", "give", "take", "go",
];

static BARE_NOUN_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:the|a|an)\s+\w+\s*[.!?]?$").expect("valid noun phrase regex")
});

static LET_US: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:let us|do not)\b").expect("valid let us regex"));

/// "Never has it been", a declarative inversion rather than a command.
static NEGATIVE_INVERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^never\s+(?:has|have|had|was|were|been)\b").expect("valid negative inversion regex")
});

static ASR_ARTIFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+|\b\w+\.(?:com|org|net)\b|\buse\s+code\s+\w+")
        .expect("valid asr artifact regex")
});

/// Configuration for sentence typing and repair flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fragment evidence score at which a short sentence is a fragment
    pub fragment_threshold: f64,
    /// Sentences with at least this many words are never scored as fragments
    pub fragment_max_words: usize,
    /// Verbless sentences shorter than this are fragments
    pub verbless_max_words: usize,
    /// Length without `.?!;` that flags a run-on
    pub run_on_chars: usize,
    /// Filler share that flags a sentence for repair
    pub filler_ratio: f64,
    /// Conjunction-led sentences shorter than this are flagged
    pub short_conjunction_tokens: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fragment_threshold: 0.6,
            fragment_max_words: 8,
            verbless_max_words: 6,
            run_on_chars: 220,
            filler_ratio: 0.35,
            short_conjunction_tokens: 7,
        }
    }
}

/// Which sentence types may reach the detectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub allow_questions: bool,
    pub allow_imperatives: bool,
}

/// Type, fixed rule confidence and optional repair reason for one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub sentence_type: SentenceType,
    pub confidence: f64,
    pub repair_reason: Option<String>,
}

/// Rule-based sentence typer.
#[derive(Debug)]
pub struct SentenceClassifier {
    config: ClassifierConfig,
    fragment_signals: WeightedSignals<str>,
}

impl SentenceClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let fragment_signals = WeightedSignals::<str>::new(config.fragment_threshold)
            .signal("conjunction_opener", 0.4, opens_with_conjunction)
            .signal("no_terminal_punctuation", 0.2, |t: &str| !ends_with_terminal(t))
            .signal("no_finite_verb", 0.4, |t: &str| !has_finite_verb(t))
            .signal("bare_noun_phrase", 0.4, |t: &str| BARE_NOUN_PHRASE.is_match(t.trim()));

        Self {
            config,
            fragment_signals,
        }
    }

    pub fn classify(&self, text: &str) -> Classification {
        let trimmed = text.trim();
        let end = trimmed.trim_end_matches(['"', '\'', ')', ']', '\u{201d}']);
        let word_count = trimmed.split_whitespace().count();

        let (sentence_type, confidence, fragment_reason) = if end.ends_with('?') {
            (SentenceType::Question, 0.9, None)
        } else if end.ends_with('!') {
            (SentenceType::Exclamation, 0.8, None)
        } else if is_imperative(trimmed) {
            (SentenceType::Imperative, 0.7, None)
        } else {
            let score = self.fragment_signals.score(trimmed);
            let finite = !score.fired("no_finite_verb");
            if score.passed && word_count < self.config.fragment_max_words {
                let reason = if score.fired("conjunction_opener") {
                    "conjunction opener without main clause"
                } else {
                    "incomplete clause"
                };
                (SentenceType::Fragment, 0.8, Some(reason))
            } else if !finite && word_count < self.config.verbless_max_words {
                (SentenceType::Fragment, 0.6, Some("no finite verb"))
            } else if finite {
                (SentenceType::Statement, 0.9, None)
            } else {
                (SentenceType::Statement, 0.5, None)
            }
        };

        let repair_reason = fragment_reason
            .map(str::to_string)
            .or_else(|| self.repair_reason(trimmed));

        Classification {
            sentence_type,
            confidence,
            repair_reason,
        }
    }

    /// Flags run-ons, filler-heavy text, short conjunction openers and ASR
    /// debris. Repair itself happens elsewhere.
    fn repair_reason(&self, text: &str) -> Option<String> {
        if text.chars().count() >= self.config.run_on_chars && !text.contains(['.', '?', '!', ';']) {
            return Some("run-on without punctuation".to_string());
        }
        let ratio = filler_ratio(text);
        if ratio > self.config.filler_ratio {
            return Some(format!("filler ratio {:.2}", ratio));
        }
        if opens_with_conjunction(text) && text.split_whitespace().count() < self.config.short_conjunction_tokens {
            return Some("short conjunction opener".to_string());
        }
        if has_repeated_word(text) || ASR_ARTIFACT.is_match(text) {
            return Some("transcription artifact".to_string());
        }
        None
    }
}

impl Default for SentenceClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

fn opens_with_conjunction(text: &str) -> bool {
    first_word(text).is_some_and(|w| {
        COORDINATING_CONJUNCTIONS.contains(&w.as_str()) || SUBORDINATING_CONJUNCTIONS.contains(&w.as_str())
    })
}

fn is_imperative(text: &str) -> bool {
    if NEGATIVE_INVERSION.is_match(text) {
        return false;
    }
    LET_US.is_match(text) || first_word(text).is_some_and(|w| IMPERATIVE_OPENERS.contains(&w.as_str()))
}

/// "the the" style stutter; `regex` has no backreferences.
fn has_repeated_word(text: &str) -> bool {
    words(text)
        .windows(2)
        .any(|pair| pair[0] == pair[1] && pair[0].chars().any(char::is_alphabetic))
}

/// Admits sentences into claim detection.
#[derive(Debug, Clone, Default)]
pub struct ClaimGate {
    config: GateConfig,
}

impl ClaimGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Why a sentence is kept out, or `None` if it may be processed.
    pub fn rejection_reason(&self, sentence: &ClassifiedSentence) -> Option<&'static str> {
        match sentence.sentence_type {
            SentenceType::Fragment => Some("fragment"),
            SentenceType::Question if !self.config.allow_questions => Some("question"),
            SentenceType::Imperative if !self.config.allow_imperatives => Some("imperative"),
            _ => None,
        }
    }

    pub fn should_process(&self, sentence: &ClassifiedSentence) -> bool {
        self.rejection_reason(sentence).is_none()
    }
}

/// Split each turn into sentences, type them and check their spans.
///
/// Span mismatches are logged and counted; they never stop the run.
pub fn segment_turns(
    document: &str,
    turns: &[Turn],
    classifier: &SentenceClassifier,
    diagnostics: &mut Diagnostics,
) -> Vec<ClassifiedSentence> {
    let mut sentences = Vec::new();

    for turn in turns {
        if !turn.matches_document(document) {
            warn!("Turn {} text does not match document at {:?}", turn.id, turn.span);
            diagnostics.span_mismatches += 1;
        }

        for (index, piece) in split_sentences(&turn.text).into_iter().enumerate() {
            let span = turn.offsets.map_span(piece.span);
            if !turn.offsets.slice(piece.span).verify(document, &piece.text) || span.validate(document).is_err() {
                warn!(
                    "Sentence span mismatch in {}: {:?} vs {:?}",
                    turn.id,
                    normalize_whitespace(&piece.text),
                    span.slice(document).map(normalize_whitespace)
                );
                diagnostics.span_mismatches += 1;
            }

            let classification = classifier.classify(&piece.text);
            diagnostics.count_sentence(classification.sentence_type);
            if classification.repair_reason.is_some() {
                diagnostics.repair_candidates += 1;
            }

            sentences.push(ClassifiedSentence {
                id: ClassifiedSentence::make_id(&turn.id, index),
                text: piece.text,
                span,
                turn_id: turn.id.clone(),
                speaker: turn.speaker.clone(),
                index_in_turn: index,
                sentence_type: classification.sentence_type,
                type_confidence: classification.confidence,
                needs_repair: classification.repair_reason.is_some(),
                repair_reason: classification.repair_reason,
            });
        }
    }

    info!(
        "Segmented {} turns into {} sentences ({} flagged for repair)",
        turns.len(),
        sentences.len(),
        diagnostics.repair_candidates
    );
    sentences
}

/// Sentences the gate admits, with rejections counted per reason.
pub fn gate_sentences<'s>(
    sentences: &'s [ClassifiedSentence],
    gate: &ClaimGate,
    diagnostics: &mut Diagnostics,
) -> Vec<&'s ClassifiedSentence> {
    let admitted: Vec<&ClassifiedSentence> = sentences
        .iter()
        .filter(|sentence| match gate.rejection_reason(sentence) {
            Some(reason) => {
                debug!("Gated out {} ({}): {:?}", sentence.id, reason, sentence.text);
                diagnostics.count_gated(reason, &sentence.text);
                false
            }
            None => true,
        })
        .collect();

    info!(
        "Claim gate admitted {} of {} sentences",
        admitted.len(),
        sentences.len()
    );
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Span;

    fn classify(text: &str) -> Classification {
        SentenceClassifier::default().classify(text)
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(classify("Is it true?").sentence_type, SentenceType::Question);
        assert_eq!(classify("What a night!").sentence_type, SentenceType::Exclamation);
        assert_eq!(classify("Consider the budget.").sentence_type, SentenceType::Imperative);
        assert_eq!(classify("Let us be clear about this.").sentence_type, SentenceType::Imperative);
        assert_eq!(classify("Unemployment fell to four percent.").sentence_type, SentenceType::Statement);
    }

    #[test]
    fn test_never_inversion_is_declarative() {
        assert_eq!(classify("Never do that again.").sentence_type, SentenceType::Imperative);
        let c = classify("Never has unemployment been this low in America.");
        assert_eq!(c.sentence_type, SentenceType::Statement);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn test_fragments() {
        let c = classify("yeah");
        assert_eq!(c.sentence_type, SentenceType::Fragment);
        assert!(c.repair_reason.is_some());

        let c = classify("because of the war");
        assert_eq!(c.sentence_type, SentenceType::Fragment);
        assert_eq!(c.confidence, 0.8);

        assert_eq!(classify("The budget.").sentence_type, SentenceType::Fragment);
    }

    #[test]
    fn test_statement_confidence() {
        let c = classify("so there is also stochastic uncertainty in the universe it's built in there's randomness.");
        assert_eq!(c.sentence_type, SentenceType::Statement);
        assert_eq!(c.confidence, 0.9);

        let c = classify("A quiet town with a tiny river and a bright future for all.");
        assert_eq!(c.sentence_type, SentenceType::Statement);
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn test_repair_triggers() {
        let long = "we talked about it ".repeat(15);
        assert_eq!(
            classify(long.trim()).repair_reason.as_deref(),
            Some("run-on without punctuation")
        );
        assert_eq!(
            classify("The the economy is growing quickly now.").repair_reason.as_deref(),
            Some("transcription artifact")
        );
        assert!(classify("Visit example.com for the full report today.").repair_reason.is_some());
        assert!(classify("Um, uh, well, yeah, the bill passed.").repair_reason.unwrap().starts_with("filler"));
        assert!(classify("Unemployment fell to four percent.").repair_reason.is_none());
    }

    fn sentence(sentence_type: SentenceType) -> ClassifiedSentence {
        ClassifiedSentence {
            id: "turn_0000_s000".to_string(),
            text: "x".to_string(),
            span: Span::new(0, 1),
            turn_id: "turn_0000".to_string(),
            speaker: "A".to_string(),
            index_in_turn: 0,
            sentence_type,
            type_confidence: 0.9,
            needs_repair: false,
            repair_reason: None,
        }
    }

    #[test]
    fn test_gate() {
        let gate = ClaimGate::default();
        assert!(gate.should_process(&sentence(SentenceType::Statement)));
        assert!(gate.should_process(&sentence(SentenceType::Exclamation)));
        assert!(!gate.should_process(&sentence(SentenceType::Fragment)));
        assert!(!gate.should_process(&sentence(SentenceType::Question)));
        assert!(!gate.should_process(&sentence(SentenceType::Imperative)));

        let permissive = ClaimGate::new(GateConfig {
            allow_questions: true,
            allow_imperatives: true,
        });
        assert!(permissive.should_process(&sentence(SentenceType::Question)));
        assert!(permissive.should_process(&sentence(SentenceType::Imperative)));
        assert!(!permissive.should_process(&sentence(SentenceType::Fragment)));
    }

    #[test]
    fn test_segment_and_gate() {
        let doc = "ALICE: Taxes rose 4% in 2020. Is that bad? Yeah.";
        let turn = Turn::from_document("turn_0000", "ALICE", doc, Span::new(7, doc.len()));
        let mut diagnostics = Diagnostics::default();
        let sentences = segment_turns(doc, &[turn], &SentenceClassifier::default(), &mut diagnostics);

        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].id, "turn_0000_s000");
        assert_eq!(&doc[sentences[0].span.start..sentences[0].span.end], "Taxes rose 4% in 2020.");
        assert_eq!(diagnostics.span_mismatches, 0);
        assert_eq!(diagnostics.sentences_by_type["question"], 1);

        let admitted = gate_sentences(&sentences, &ClaimGate::default(), &mut diagnostics);
        assert_eq!(admitted.len(), 1);
        assert_eq!(diagnostics.sentences_gated_out["question"], 1);
        assert_eq!(diagnostics.sentences_gated_out["fragment"], 1);
        assert_eq!(diagnostics.examples["gate:question"].len(), 1);
    }
}
