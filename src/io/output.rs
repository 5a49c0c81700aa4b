use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Claim, Diagnostics, FactCheckRequest, FallacyRequest};
use crate::pipeline::ExtractionResult;

/// Machine-readable extraction report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimReport {
    /// Where the document came from (file path or "-")
    pub source: String,
    pub claims: Vec<Claim>,
    /// Claims as the fact-checking service expects them
    pub fact_check_requests: Vec<FactCheckRequest>,
    /// Claims as the fallacy detector expects them
    pub fallacy_requests: Vec<FallacyRequest>,
    pub diagnostics: Diagnostics,
}

impl ClaimReport {
    pub fn from_result(source: impl Into<String>, result: &ExtractionResult) -> Self {
        Self {
            source: source.into(),
            claims: result.claims.clone(),
            fact_check_requests: result.claims.iter().map(Claim::fact_check_request).collect(),
            fallacy_requests: result.claims.iter().map(Claim::fallacy_request).collect(),
            diagnostics: result.diagnostics.clone(),
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse report: {:?}", path))
    }
}

/// Human-readable claim listing
pub struct HumanReport<'a> {
    source: &'a str,
    result: &'a ExtractionResult,
}

impl<'a> HumanReport<'a> {
    pub fn new(source: &'a str, result: &'a ExtractionResult) -> Self {
        Self { source, result }
    }

    pub fn format(&self) -> String {
        let diagnostics = &self.result.diagnostics;
        let mut output = String::new();

        output.push_str(&format!("Claims from {}\n", self.source));
        output.push_str(&format!(
            "{} claims, {} sentences, {} turns ({} input)\n\n",
            self.result.claims.len(),
            diagnostics.sentences_total,
            diagnostics.turns_created,
            diagnostics.input_mode
        ));

        for (i, claim) in self.result.claims.iter().enumerate() {
            let check = if claim.should_fact_check { "" } else { ", not fact-checked" };
            output.push_str(&format!(
                "{:>3}. [{}] {} @{}..{} ({:.2}{})\n",
                i + 1,
                claim.claim_type,
                claim.speaker,
                claim.span.start,
                claim.span.end,
                claim.confidence,
                check
            ));
            for line in wrap_text(&claim.text, 76).lines() {
                output.push_str(&format!("     {}\n", line));
            }
            output.push('\n');
        }

        for message in &diagnostics.messages {
            output.push_str(&format!("note: {}\n", message));
        }
        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaimType, Span};

    fn result() -> ExtractionResult {
        let claim = Claim {
            id: "c1".to_string(),
            claim_type: ClaimType::Statistical,
            text: "Unemployment fell to 4% last year.".to_string(),
            speaker: "SMITH".to_string(),
            span: Span::new(7, 41),
            sentence_id: "turn_0000_s000".to_string(),
            turn_id: "turn_0000".to_string(),
            confidence: 0.8,
            context: "Unemployment fell to 4% last year.".to_string(),
            should_fact_check: true,
            classification_reason: "Neutral content - allowing fact-checking".to_string(),
        };
        let mut diagnostics = Diagnostics::default();
        diagnostics.input_mode = "labeled".to_string();
        diagnostics.final_claims = 1;
        ExtractionResult {
            claims: vec![claim],
            turns: Vec::new(),
            sentences: Vec::new(),
            diagnostics,
        }
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a test of the text wrapping function that should wrap at 20 chars";
        let wrapped = wrap_text(text, 20);
        for line in wrapped.lines() {
            assert!(line.len() <= 20);
        }
        assert_eq!(wrapped.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn test_report_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");

        let report = ClaimReport::from_result("debate.txt", &result());
        report.write_json(&path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["claims"][0]["type"], "statistical");
        assert_eq!(json["fact_check_requests"][0]["should_fact_check"], true);
        assert_eq!(json["fallacy_requests"][0]["speaker"], "SMITH");
        assert_eq!(json["diagnostics"]["final_claims"], 1);

        let back = ClaimReport::read_json(&path).unwrap();
        assert_eq!(back.claims, report.claims);
    }

    #[test]
    fn test_human_report() {
        let result = result();
        let text = HumanReport::new("debate.txt", &result).format();
        assert!(text.starts_with("Claims from debate.txt\n"));
        assert!(text.contains("1. [statistical] SMITH @7..41 (0.80)"));
        assert!(text.contains("Unemployment fell to 4% last year."));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.txt");
        HumanReport::new("debate.txt", &result).write_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }
}
