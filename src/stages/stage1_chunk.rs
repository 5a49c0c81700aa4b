use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{OffsetMap, Span, Turn, Utterance};

static SCENE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[.*\]|-{3,}|={3,}|\*{3,})\s*$").expect("valid scene break regex")
});

static TOPIC_SHIFT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:but|however|anyway|meanwhile|now|so|well|actually|let me|can i|i want to|by the way|speaking of|that reminds me)\b",
    )
    .expect("valid topic shift regex")
});

/// Configuration for grouping labeled utterances into turns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Largest source-line gap between utterances of one turn
    pub max_line_gap: usize,
    /// Turns with fewer characters are dropped
    pub min_turn_chars: usize,
    /// Utterances the open turn must hold before a topic shift can split it
    pub topic_shift_min_utterances: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_line_gap: 2,
            min_turn_chars: 2,
            topic_shift_min_utterances: 2,
        }
    }
}

/// Result of chunking
#[derive(Debug, Clone)]
pub struct ChunkResult {
    pub turns: Vec<Turn>,
    pub scene_breaks: usize,
    /// Turns discarded for being shorter than `min_turn_chars`
    pub dropped_short: usize,
}

pub fn is_scene_break(text: &str) -> bool {
    SCENE_BREAK.is_match(text)
}

/// Why an open turn was closed before an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakReason {
    SpeakerChange,
    TopicShift,
    LineGap,
}

/// Group consecutive same-speaker utterances into turns.
///
/// Turn text is the utterance texts joined with a single space; the offset
/// map keeps every piece tied to its exact location in the document.
pub fn chunk_utterances(utterances: &[Utterance], config: &ChunkerConfig) -> ChunkResult {
    let mut builder = TurnBuilder::new(config.min_turn_chars);
    let mut group: Vec<&Utterance> = Vec::new();
    let mut scene_breaks = 0usize;

    for utterance in utterances {
        if is_scene_break(&utterance.text) {
            debug!("Scene break at line {}", utterance.source_line);
            scene_breaks += 1;
            builder.close(&mut group);
            continue;
        }

        if let Some(reason) = break_reason(&group, utterance, config) {
            debug!("Closing turn before line {}: {:?}", utterance.source_line, reason);
            builder.close(&mut group);
        }
        group.push(utterance);
    }
    builder.close(&mut group);

    info!(
        "Chunked {} utterances into {} turns ({} scene breaks, {} short turns dropped)",
        utterances.len(),
        builder.turns.len(),
        scene_breaks,
        builder.dropped_short
    );

    ChunkResult {
        turns: builder.turns,
        scene_breaks,
        dropped_short: builder.dropped_short,
    }
}

fn break_reason(group: &[&Utterance], next: &Utterance, config: &ChunkerConfig) -> Option<BreakReason> {
    let last = group.last()?;
    if last.speaker != next.speaker {
        return Some(BreakReason::SpeakerChange);
    }
    if group.len() >= config.topic_shift_min_utterances && TOPIC_SHIFT.is_match(&next.text) {
        return Some(BreakReason::TopicShift);
    }
    if next.source_line.saturating_sub(last.source_line) > config.max_line_gap {
        return Some(BreakReason::LineGap);
    }
    None
}

struct TurnBuilder {
    turns: Vec<Turn>,
    dropped_short: usize,
    min_turn_chars: usize,
}

impl TurnBuilder {
    fn new(min_turn_chars: usize) -> Self {
        Self {
            turns: Vec::new(),
            dropped_short: 0,
            min_turn_chars,
        }
    }

    fn close(&mut self, group: &mut Vec<&Utterance>) {
        if group.is_empty() {
            return;
        }
        let turn = build_turn(group, self.turns.len());
        group.clear();

        if turn.text.chars().count() < self.min_turn_chars {
            debug!("Dropping short turn {:?}", turn.text);
            self.dropped_short += 1;
            return;
        }
        self.turns.push(turn);
    }
}

fn build_turn(group: &[&Utterance], ordinal: usize) -> Turn {
    let mut text = String::new();
    let mut offsets = OffsetMap::default();
    let mut span: Option<Span> = None;

    for utterance in group {
        let piece = utterance.text.trim();
        if piece.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        let leading = utterance.text.len() - utterance.text.trim_start().len();
        let doc_start = utterance.span.start + leading;
        offsets.push(text.len(), doc_start, piece.len());
        text.push_str(piece);

        let piece_span = Span::new(doc_start, doc_start + piece.len());
        span = Some(match span {
            Some(s) => s.union(&piece_span),
            None => piece_span,
        });
    }

    Turn {
        id: format!("turn_{:04}", ordinal),
        ordinal,
        speaker: group[0].speaker.clone(),
        span: span.unwrap_or_else(|| Span::new(group[0].span.start, group[0].span.start)),
        text,
        utterance_count: group.len(),
        source_lines: group.iter().map(|u| u.source_line).collect(),
        confidence: 1.0,
        offsets,
    }
}
