use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::split_sentences;
use crate::heuristics::{contains_term, WeightedSignals};
use crate::models::{Participant, Span, Turn, UNKNOWN_SPEAKER};

static TURN_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:thank you|thanks)(?:\s+(?:very much|so much))?[.,]?\s*|(?:yes|no|yeah|nope|nah|right|okay|ok|correct|exactly|absolutely|sure)[.,]?\s+|(?:well|so|look|see|now|okay|alright|actually)[.,]\s+|(?:hold on|wait|time out|timeout|let me)[.,]?\s+|(?:i mean|i think|i believe|i would|i'd|in my)[.,]?\s+)",
    )
    .expect("valid turn opener regex")
});

static STAGE_DIRECTION_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\[[^\]]+\]|\([^)]+\))[.!?]?\s*$").expect("valid stage direction regex")
});

static CLOSING_COURTESY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:thank you|thanks)(?:\s+(?:very much|so much))?[.!]?\s*$")
        .expect("valid closing courtesy regex")
});

static OPENING_COURTESY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:thank you|thanks)\b").expect("valid opening courtesy regex"));

/// Configuration for turn detection on unlabeled text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnDetectorConfig {
    /// Boundary confidence at or above which a new turn starts
    pub boundary_threshold: f64,
    /// Buffer size that forces a boundary
    pub max_turn_sentences: usize,
    /// Prior sentence was a question and this one is not
    pub question_shift_weight: f64,
    /// Sentence opens with a turn-taking marker ("Well, ", "No, ")
    pub discourse_marker_weight: f64,
    /// Sentence opens by addressing a known participant
    pub direct_address_weight: f64,
    /// Prior sentence ends with a stage direction ("[Applause]")
    pub stage_direction_weight: f64,
    /// Each of closing / opening "thank you"
    pub courtesy_weight: f64,
    /// Known participants
    pub participants: Vec<Participant>,
    /// Label for the other party when only one participant is known
    pub counterpart_label: String,
}

impl Default for TurnDetectorConfig {
    fn default() -> Self {
        Self {
            boundary_threshold: 0.3,
            max_turn_sentences: 20,
            question_shift_weight: 0.3,
            discourse_marker_weight: 0.35,
            direct_address_weight: 0.4,
            stage_direction_weight: 0.5,
            courtesy_weight: 0.25,
            participants: Vec::new(),
            counterpart_label: "OTHER".to_string(),
        }
    }
}

/// Two adjacent sentences being tested for a speaker change
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPair<'a> {
    pub prev: &'a str,
    pub curr: &'a str,
}

/// Result of turn detection
#[derive(Debug, Clone)]
pub struct TurnDetection {
    pub turns: Vec<Turn>,
    pub sentences_seen: usize,
    /// Boundaries forced by `max_turn_sentences`
    pub forced_boundaries: usize,
}

/// Group the sentences of an unlabeled document into speaker turns.
///
/// One pass with a single open buffer: each sentence is scored against its
/// predecessor and either joins the buffer or closes it. Speakers are
/// inferred afterwards from direct address and alternation.
pub fn detect_turns(document: &str, config: &TurnDetectorConfig) -> TurnDetection {
    let sentences = split_sentences(document);
    if sentences.is_empty() {
        return TurnDetection {
            turns: Vec::new(),
            sentences_seen: 0,
            forced_boundaries: 0,
        };
    }

    let signals = boundary_signals(config);
    let mut groups: Vec<(Span, f64)> = Vec::new();
    let mut open_span = sentences[0].span;
    let mut open_len = 1usize;
    let mut open_confidence = 0.5;
    let mut forced = 0usize;

    for pair in sentences.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let score = signals.score(&BoundaryPair {
            prev: &prev.text,
            curr: &curr.text,
        });
        let force = open_len >= config.max_turn_sentences;

        if score.passed || force {
            if force && !score.passed {
                forced += 1;
            }
            debug!(
                "Turn boundary before {:?} (confidence {:.2}, signals {:?})",
                curr.span, score.value, score.fired
            );
            groups.push((open_span, open_confidence));
            open_span = curr.span;
            open_len = 1;
            open_confidence = score.value;
        } else {
            open_span = open_span.union(&curr.span);
            open_len += 1;
        }
    }
    groups.push((open_span, open_confidence));

    let mut turns: Vec<Turn> = groups
        .into_iter()
        .enumerate()
        .map(|(ordinal, (span, confidence))| {
            let mut turn = Turn::from_document(format!("turn_{:04}", ordinal), UNKNOWN_SPEAKER, document, span);
            turn.ordinal = ordinal;
            turn.confidence = confidence;
            turn
        })
        .collect();

    infer_speakers(&mut turns, config);

    info!(
        "Detected {} turns from {} sentences ({} forced boundaries)",
        turns.len(),
        sentences.len(),
        forced
    );

    TurnDetection {
        turns,
        sentences_seen: sentences.len(),
        forced_boundaries: forced,
    }
}

fn boundary_signals<'a>(config: &TurnDetectorConfig) -> WeightedSignals<BoundaryPair<'a>> {
    let mut signals: WeightedSignals<BoundaryPair<'a>> = WeightedSignals::new(config.boundary_threshold)
        .signal("question_shift", config.question_shift_weight, |p: &BoundaryPair| {
            p.prev.trim_end().ends_with('?') && !p.curr.trim_end().ends_with('?')
        })
        .signal("discourse_marker", config.discourse_marker_weight, |p: &BoundaryPair| {
            TURN_OPENER.is_match(p.curr)
        });

    if let Some(address) = direct_address_regex(&config.participants) {
        signals = signals.signal("direct_address", config.direct_address_weight, move |p: &BoundaryPair| {
            address.is_match(p.curr)
        });
    }

    signals
        .signal("stage_direction", config.stage_direction_weight, |p: &BoundaryPair| {
            STAGE_DIRECTION_TAIL.is_match(p.prev)
        })
        .signal("closing_courtesy", config.courtesy_weight, |p: &BoundaryPair| {
            CLOSING_COURTESY.is_match(p.prev)
        })
        .signal("opening_courtesy", config.courtesy_weight, |p: &BoundaryPair| {
            OPENING_COURTESY.is_match(p.curr)
        })
}

/// `^(?:name|alias)[.,]?\s+` over every participant mention term.
fn direct_address_regex(participants: &[Participant]) -> Option<Regex> {
    let mut terms: Vec<String> = participants
        .iter()
        .flat_map(|p| p.mention_terms())
        .map(|t| regex::escape(&t))
        .collect();
    if terms.is_empty() {
        return None;
    }
    // longest first so "mr. kirk" wins over "kirk"
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));
    Regex::new(&format!(r"(?i)^(?:{})[.,]?\s+", terms.join("|"))).ok()
}

/// Assign speakers: a turn that opens by naming a participant belongs to the
/// other party, otherwise speakers alternate.
fn infer_speakers(turns: &mut [Turn], config: &TurnDetectorConfig) {
    let parties = parties(config);
    let mut previous: Option<String> = None;

    for turn in turns.iter_mut() {
        let opening: String = split_sentences(&turn.text)
            .into_iter()
            .take(2)
            .map(|s| s.text)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let addressed = config.participants.iter().find(|p| {
            p.mention_terms()
                .iter()
                .any(|term| contains_term(&opening, term))
        });

        let speaker = match addressed {
            Some(p) => complement(&p.label(), &parties),
            None => match &previous {
                Some(prev) => complement(prev, &parties),
                None => UNKNOWN_SPEAKER.to_string(),
            },
        };

        turn.speaker = speaker.clone();
        previous = Some(speaker);
    }
}

/// The two parties of the conversation, when they can be named.
fn parties(config: &TurnDetectorConfig) -> Vec<String> {
    match config.participants.as_slice() {
        [only] => vec![only.label(), config.counterpart_label.clone()],
        [a, b] => vec![a.label(), b.label()],
        _ => Vec::new(),
    }
}

fn complement(label: &str, parties: &[String]) -> String {
    match parties {
        [a, b] if a == label => b.clone(),
        [a, b] if b == label => a.clone(),
        _ => UNKNOWN_SPEAKER.to_string(),
    }
}
