use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{Span, Turn};

/// Separators tried in priority order, with the tag used in fragment ids.
const SEPARATORS: &[(&str, &str)] = &[
    ("; ", "semi"),
    (" \u{2014} ", "emdash"),
    (" \u{2013} ", "endash"),
    (", ", "comma"),
];

const TOKEN_TAG: &str = "tok";

/// Configuration for re-splitting oversized turns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FailsafeConfig {
    /// Turns longer than this many characters are split
    pub max_turn_chars: usize,
    /// Turns with more words than this and no terminal punctuation are split
    pub unpunctuated_word_limit: usize,
    /// Every separator part must have more words than this
    pub min_part_words: usize,
    /// Words per chunk when no separator qualifies
    pub token_budget: usize,
}

impl Default for FailsafeConfig {
    fn default() -> Self {
        Self {
            max_turn_chars: 10_000,
            unpunctuated_word_limit: 100,
            min_part_words: 5,
            token_budget: 120,
        }
    }
}

/// Result of the failsafe pass
#[derive(Debug, Clone)]
pub struct FailsafeResult {
    pub turns: Vec<Turn>,
    /// Parent turns that were replaced
    pub split_turns: usize,
    /// Chunks placed at the cursor because their text could not be found
    pub relocation_failures: usize,
    pub messages: Vec<String>,
}

/// Split every turn that is too long or runs on without punctuation.
///
/// Fragments are located by searching the parent text for each part, never
/// by adding up lengths, so a fragment's span is exact even when the split
/// dropped separators or collapsed whitespace.
pub fn apply_failsafe(turns: Vec<Turn>, config: &FailsafeConfig) -> FailsafeResult {
    let mut out = Vec::with_capacity(turns.len());
    let mut split_turns = 0usize;
    let mut relocation_failures = 0usize;
    let mut messages = Vec::new();

    for turn in turns {
        if !needs_split(&turn, config) {
            out.push(turn);
            continue;
        }

        let mut splitter = Splitter {
            config,
            failures: 0,
            messages: &mut messages,
        };
        let children = splitter.split(&turn);
        relocation_failures += splitter.failures;

        if children.len() < 2 {
            out.push(turn);
            continue;
        }

        info!(
            "Failsafe split {} ({} chars, {} words) into {} turns",
            turn.id,
            turn.text.len(),
            turn.word_count(),
            children.len()
        );
        split_turns += 1;
        out.extend(children);
    }

    for (ordinal, turn) in out.iter_mut().enumerate() {
        turn.ordinal = ordinal;
    }

    FailsafeResult {
        turns: out,
        split_turns,
        relocation_failures,
        messages,
    }
}

pub fn needs_split(turn: &Turn, config: &FailsafeConfig) -> bool {
    if turn.text.chars().count() > config.max_turn_chars {
        return true;
    }
    turn.word_count() > config.unpunctuated_word_limit && !turn.text.contains(['.', '!', '?'])
}

struct Splitter<'a> {
    config: &'a FailsafeConfig,
    failures: usize,
    messages: &'a mut Vec<String>,
}

impl Splitter<'_> {
    fn split(&mut self, turn: &Turn) -> Vec<Turn> {
        if let Some((tag, parts)) = self.separator_parts(&turn.text) {
            let spans = self.locate_all(turn, &parts);
            let mut children = Vec::new();
            for (i, rel) in spans.into_iter().enumerate() {
                let child = child_turn(turn, rel, tag, i + 1);
                if needs_split(&child, self.config) {
                    // a part can still be oversized; chunk it by tokens
                    children.extend(self.token_split(&child));
                } else {
                    children.push(child);
                }
            }
            return children;
        }
        self.token_split(turn)
    }

    /// First separator giving two or more parts that are all long enough.
    fn separator_parts<'t>(&self, text: &'t str) -> Option<(&'static str, Vec<&'t str>)> {
        SEPARATORS.iter().find_map(|(sep, tag)| {
            let parts: Vec<&str> = text.split(*sep).map(str::trim).filter(|p| !p.is_empty()).collect();
            let qualifies = parts.len() >= 2
                && parts
                    .iter()
                    .all(|p| p.split_whitespace().count() > self.config.min_part_words);
            qualifies.then_some((*tag, parts))
        })
    }

    fn token_split(&mut self, turn: &Turn) -> Vec<Turn> {
        let words: Vec<&str> = turn.text.split_whitespace().collect();
        let budget = self.config.token_budget.max(1);
        if words.len() <= budget {
            return vec![turn.clone()];
        }

        let chunks: Vec<String> = words.chunks(budget).map(|c| c.join(" ")).collect();
        let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        self.locate_all(turn, &chunk_refs)
            .into_iter()
            .enumerate()
            .map(|(i, rel)| child_turn(turn, rel, TOKEN_TAG, i + 1))
            .collect()
    }

    /// Relative spans for each part, searched left to right from a cursor.
    fn locate_all(&mut self, turn: &Turn, parts: &[&str]) -> Vec<Span> {
        let text = turn.text.as_str();
        let mut cursor = 0usize;
        let mut spans = Vec::with_capacity(parts.len());

        for part in parts {
            let span = match locate(text, part, cursor) {
                Some(span) => span,
                None => {
                    // best effort: take the same length from the cursor
                    self.failures += 1;
                    let end = floor_char_boundary(text, (cursor + part.len()).min(text.len()));
                    let message = format!(
                        "Could not relocate fragment of {} at offset {}; using cursor position",
                        turn.id, cursor
                    );
                    warn!("{}", message);
                    self.messages.push(message);
                    if text[cursor..end].trim().is_empty() {
                        debug!("Dropping empty fragment of {} at {}", turn.id, cursor);
                        continue;
                    }
                    Span::new(cursor, end)
                }
            };
            debug!("Fragment of {} at {:?}", turn.id, span);
            cursor = span.end;
            spans.push(span);
        }
        spans
    }
}

/// Earliest occurrence of `needle` at or after `cursor`, matched either
/// exactly or with any run of whitespace between words.
fn locate(haystack: &str, needle: &str, cursor: usize) -> Option<Span> {
    let tail = haystack.get(cursor..)?;
    let exact = tail.find(needle).map(|pos| {
        let start = cursor + pos;
        Span::new(start, start + needle.len())
    });
    let tolerant = locate_tolerant(haystack, needle, cursor);
    match (exact, tolerant) {
        (Some(a), Some(b)) => Some(if b.start < a.start { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn locate_tolerant(haystack: &str, needle: &str, cursor: usize) -> Option<Span> {
    let wanted: Vec<&str> = needle.split_whitespace().collect();
    if wanted.is_empty() {
        return None;
    }
    let tokens: Vec<(usize, &str)> = word_positions(haystack)
        .into_iter()
        .filter(|(pos, _)| *pos >= cursor)
        .collect();

    tokens.windows(wanted.len()).find_map(|window| {
        let matches = window.iter().zip(&wanted).all(|((_, tok), want)| tok == want);
        matches.then(|| {
            let (first_pos, _) = window[0];
            let (last_pos, last) = window[window.len() - 1];
            Span::new(first_pos, last_pos + last.len())
        })
    })
}

fn word_positions(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push((s, &text[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn child_turn(parent: &Turn, rel: Span, tag: &str, index: usize) -> Turn {
    Turn {
        id: format!("{}_{}{:03}", parent.id, tag, index),
        ordinal: parent.ordinal,
        speaker: parent.speaker.clone(),
        text: rel.slice(&parent.text).unwrap_or_default().to_string(),
        span: parent.offsets.map_span(rel),
        utterance_count: parent.utterance_count,
        source_lines: parent.source_lines.clone(),
        confidence: parent.confidence,
        offsets: parent.offsets.slice(rel),
    }
}
