use serde::{Deserialize, Serialize};

use super::Span;

/// One labeled line of input, as produced by the transcript parser or an
/// external normalizer. Never mutated after ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Normalized speaker label
    pub speaker: String,
    /// Text with the speaker label stripped
    pub text: String,
    /// 1-based line number in the source
    pub source_line: usize,
    /// Location of `text` in the document
    pub span: Span,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>, source_line: usize, span: Span) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            source_line,
            span,
        }
    }
}
