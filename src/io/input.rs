use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{normalize_speaker, Span, Utterance, UNKNOWN_SPEAKER};

/// `Label: text`, label starting with a letter and at most 40 characters.
static COLON_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9 .'\-]{0,39}):(?:\s+|$)").expect("valid colon label regex")
});

/// `[LABEL] text` or `(LABEL) text` with an uppercase label.
static BRACKET_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[([A-Z][A-Z0-9 .'\-]{0,39})\]|\(([A-Z][A-Z0-9 .'\-]{0,39})\))\s+")
        .expect("valid bracket label regex")
});

const MAX_LABEL_WORDS: usize = 4;

/// A document split into labeled lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// The document every span points into
    pub document: String,
    pub utterances: Vec<Utterance>,
    /// Lines that carried an explicit speaker label
    pub labeled_lines: usize,
}

impl ParsedTranscript {
    /// Whether the labeled path applies: at least one line named its speaker.
    pub fn is_labeled(&self) -> bool {
        self.labeled_lines > 0
    }
}

/// One `(speaker, text, source_line)` record of triples input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceRecord {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub source_line: usize,
}

/// Speaker label at the head of a line and the byte offset where its text
/// begins.
fn line_label(line: &str) -> Option<(&str, usize)> {
    if let Some(caps) = COLON_LABEL.captures(line) {
        let label = caps.get(1)?.as_str().trim();
        if label.split_whitespace().count() <= MAX_LABEL_WORDS {
            return Some((label, caps.get(0)?.end()));
        }
    }
    let caps = BRACKET_LABEL.captures(line)?;
    let label = caps.get(1).or_else(|| caps.get(2))?;
    let text_start = caps.get(0)?.end();
    if line[text_start..].trim().is_empty() {
        return None;
    }
    Some((label.as_str().trim(), text_start))
}

/// Split a document into utterances, one per non-blank line.
///
/// Unlabeled lines continue the current speaker. Every utterance span is the
/// trimmed text's exact location in `document`.
pub fn parse_labeled_lines(document: &str) -> ParsedTranscript {
    let mut utterances = Vec::new();
    let mut speaker = UNKNOWN_SPEAKER.to_string();
    let mut labeled_lines = 0usize;
    let mut line_start = 0usize;

    for (index, raw_line) in document.split_inclusive('\n').enumerate() {
        let offset = line_start;
        line_start += raw_line.len();

        let line = raw_line.trim_end_matches(['\n', '\r']);
        let lead = line.len() - line.trim_start().len();
        let body = line.trim_start();
        if body.trim().is_empty() {
            continue;
        }

        let mut text_offset = offset + lead;
        let mut text = body;
        if let Some((label, text_start)) = line_label(body) {
            speaker = normalize_speaker(label);
            labeled_lines += 1;
            text_offset += text_start;
            text = &body[text_start..];
        }

        let trimmed = text.trim_start();
        text_offset += text.len() - trimmed.len();
        let trimmed = trimmed.trim_end();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Line {}: {} -> {:?}", index + 1, speaker, trimmed);
        utterances.push(Utterance::new(
            speaker.clone(),
            trimmed,
            index + 1,
            Span::new(text_offset, text_offset + trimmed.len()),
        ));
    }

    info!(
        "Parsed {} utterances ({} labeled lines)",
        utterances.len(),
        labeled_lines
    );

    ParsedTranscript {
        document: document.to_string(),
        utterances,
        labeled_lines,
    }
}

/// Join triples into a synthetic document, one record per line.
pub fn utterances_from_records(records: &[UtteranceRecord]) -> ParsedTranscript {
    let mut document = String::new();
    let mut utterances = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            document.push('\n');
        }
        let start = document.len();
        document.push_str(&record.text);
        let line = if record.source_line == 0 { index + 1 } else { record.source_line };
        utterances.push(Utterance::new(
            normalize_speaker(&record.speaker),
            record.text.clone(),
            line,
            Span::new(start, document.len()),
        ));
    }

    ParsedTranscript {
        labeled_lines: utterances.len(),
        document,
        utterances,
    }
}

/// Parse a JSON array of `{speaker, text, source_line}` records
pub fn parse_records_json(json: &str) -> Result<ParsedTranscript> {
    let records: Vec<UtteranceRecord> =
        serde_json::from_str(json).context("Failed to parse utterance records JSON")?;
    Ok(utterances_from_records(&records))
}

/// Read a plain-text transcript
pub fn read_transcript_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Read a JSON file of utterance records
pub fn read_records_file(path: &Path) -> Result<ParsedTranscript> {
    let content = read_transcript_file(path)?;
    parse_records_json(&content).with_context(|| format!("Invalid records in {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labeled_lines() {
        let doc = "MODERATOR: Welcome to the debate.\nSen. Smith: Taxes rose 5% last year.\n\n  and they will rise again.\n";
        let parsed = parse_labeled_lines(doc);

        assert!(parsed.is_labeled());
        assert_eq!(parsed.labeled_lines, 2);
        assert_eq!(parsed.utterances.len(), 3);

        let speakers: Vec<&str> = parsed.utterances.iter().map(|u| u.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["MODERATOR", "SMITH", "SMITH"]);
        assert_eq!(parsed.utterances[2].source_line, 4);

        for u in &parsed.utterances {
            assert_eq!(u.span.slice(doc), Some(u.text.as_str()));
        }
    }

    #[test]
    fn test_bracket_labels() {
        let doc = "[HOST] Good evening.\n(JONES) Thank you for having me.\n[Applause]";
        let parsed = parse_labeled_lines(doc);
        assert_eq!(parsed.labeled_lines, 2);
        assert_eq!(parsed.utterances[0].speaker, "MODERATOR");
        assert_eq!(parsed.utterances[0].text, "Good evening.");
        assert_eq!(parsed.utterances[1].speaker, "JONES");
        // lowercase stage direction continues the current speaker
        assert_eq!(parsed.utterances[2].speaker, "JONES");
        assert_eq!(parsed.utterances[2].text, "[Applause]");
    }

    #[test]
    fn test_unlabeled_document() {
        let doc = "The deficit grew in 2020. It is still growing: nobody disputes that.";
        let parsed = parse_labeled_lines(doc);
        assert!(!parsed.is_labeled());
        assert_eq!(parsed.utterances.len(), 1);
        assert_eq!(parsed.utterances[0].speaker, UNKNOWN_SPEAKER);
    }

    #[test]
    fn test_long_label_is_text() {
        let parsed = parse_labeled_lines("The one thing everyone agrees on: taxes are high.");
        assert_eq!(parsed.labeled_lines, 0);
    }

    #[test]
    fn test_records() {
        let json = r#"[
            {"speaker": "Alice", "text": "Crime fell 10% in 2019.", "source_line": 3},
            {"speaker": "Bob", "text": "That is not true."}
        ]"#;
        let parsed = parse_records_json(json).unwrap();
        assert_eq!(parsed.document, "Crime fell 10% in 2019.\nThat is not true.");
        assert_eq!(parsed.utterances[0].source_line, 3);
        assert_eq!(parsed.utterances[1].source_line, 2);
        assert_eq!(parsed.utterances[1].speaker, "BOB");
        for u in &parsed.utterances {
            assert_eq!(u.span.slice(&parsed.document), Some(u.text.as_str()));
        }

        assert!(parse_records_json("not json").is_err());
    }
}
