use serde::{Deserialize, Serialize};

use super::{Span, UNKNOWN_SPEAKER};

/// A contiguous stretch of turn text that is copied verbatim from the
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPiece {
    /// Start within the turn text
    pub text_start: usize,
    /// Start within the document
    pub doc_start: usize,
    pub len: usize,
}

impl OffsetPiece {
    fn text_end(&self) -> usize {
        self.text_start + self.len
    }
}

/// Maps positions in a turn's text back to document offsets.
///
/// A turn joined from several utterances has separators in its text that do
/// not exist in the document; positions that land in such a gap snap to the
/// nearest copied byte in the direction that keeps spans tight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetMap {
    pieces: Vec<OffsetPiece>,
}

impl OffsetMap {
    /// Map for text that is a single verbatim slice of the document.
    pub fn contiguous(doc_start: usize, len: usize) -> Self {
        Self {
            pieces: vec![OffsetPiece {
                text_start: 0,
                doc_start,
                len,
            }],
        }
    }

    pub fn push(&mut self, text_start: usize, doc_start: usize, len: usize) {
        self.pieces.push(OffsetPiece {
            text_start,
            doc_start,
            len,
        });
    }

    pub fn pieces(&self) -> &[OffsetPiece] {
        &self.pieces
    }

    /// Document offset for a span start at `pos`.
    pub fn start_of(&self, pos: usize) -> usize {
        for piece in &self.pieces {
            if pos < piece.text_end() {
                return piece.doc_start + pos.saturating_sub(piece.text_start);
            }
        }
        self.pieces
            .last()
            .map(|p| p.doc_start + p.len)
            .unwrap_or(0)
    }

    /// Document offset for a span end at `pos`.
    pub fn end_of(&self, pos: usize) -> usize {
        for piece in self.pieces.iter().rev() {
            if pos > piece.text_start {
                return piece.doc_start + (pos - piece.text_start).min(piece.len);
            }
        }
        self.pieces.first().map(|p| p.doc_start).unwrap_or(0)
    }

    /// Absolute span for a range of turn text.
    pub fn map_span(&self, relative: Span) -> Span {
        let start = self.start_of(relative.start);
        let end = self.end_of(relative.end).max(start);
        Span::new(start, end)
    }

    /// Map restricted to `relative`, re-based so the range starts at zero.
    pub fn slice(&self, relative: Span) -> OffsetMap {
        let mut out = OffsetMap::default();
        for piece in &self.pieces {
            let start = piece.text_start.max(relative.start);
            let end = piece.text_end().min(relative.end);
            if start >= end {
                continue;
            }
            out.push(
                start - relative.start,
                piece.doc_start + (start - piece.text_start),
                end - start,
            );
        }
        out
    }

    /// True when every copied piece of `text` matches the document.
    pub fn verify(&self, document: &str, text: &str) -> bool {
        self.pieces.iter().all(|p| {
            let from_text = text.get(p.text_start..p.text_end());
            let from_doc = document.get(p.doc_start..p.doc_start + p.len);
            from_text.is_some() && from_text == from_doc
        })
    }
}

/// A maximal run of text attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Stable id; failsafe fragments extend their parent's id
    pub id: String,
    /// Position among the document's turns
    pub ordinal: usize,
    pub speaker: String,
    pub text: String,
    pub span: Span,
    pub utterance_count: usize,
    pub source_lines: Vec<usize>,
    /// Boundary confidence; 1.0 for explicitly labeled input
    pub confidence: f64,
    #[serde(skip)]
    pub offsets: OffsetMap,
}

impl Turn {
    /// Turn whose text is exactly `document[span]`.
    pub fn from_document(id: impl Into<String>, speaker: impl Into<String>, document: &str, span: Span) -> Self {
        let text = span.slice(document).unwrap_or_default().to_string();
        Self {
            id: id.into(),
            ordinal: 0,
            speaker: speaker.into(),
            offsets: OffsetMap::contiguous(span.start, text.len()),
            span,
            text,
            utterance_count: 1,
            source_lines: Vec::new(),
            confidence: 1.0,
        }
    }

    pub fn is_unattributed(&self) -> bool {
        self.speaker == UNKNOWN_SPEAKER
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Soft check that the turn text still lines up with the document.
    pub fn matches_document(&self, document: &str) -> bool {
        if self.span.validate(document).is_err() {
            return false;
        }
        if self.offsets.pieces().is_empty() {
            return self.span.slice(document).map(str::trim) == Some(self.text.trim());
        }
        self.offsets.verify(document, &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined() -> (String, String, OffsetMap) {
        // "A: alpha beta\nA: gamma" joined as "alpha beta gamma"
        let document = "A: alpha beta\nA: gamma".to_string();
        let text = "alpha beta gamma".to_string();
        let mut map = OffsetMap::default();
        map.push(0, 3, 10);
        map.push(11, 17, 5);
        (document, text, map)
    }

    #[test]
    fn test_contiguous_map() {
        let map = OffsetMap::contiguous(5, 10);
        assert_eq!(map.map_span(Span::new(2, 6)), Span::new(7, 11));
        assert_eq!(map.map_span(Span::new(0, 10)), Span::new(5, 15));
    }

    #[test]
    fn test_gap_positions_snap_inward() {
        let (document, text, map) = joined();
        assert!(map.verify(&document, &text));

        // "beta gamma" starts inside piece one and ends in piece two
        let rel = Span::new(6, 16);
        let abs = map.map_span(rel);
        assert_eq!(&document[abs.start..abs.end], "beta\nA: gamma");

        // a range that starts on the separator maps to the next piece
        assert_eq!(map.start_of(10), 17);
        // a range that ends on the separator maps to the previous piece
        assert_eq!(map.end_of(11), 13);
    }

    #[test]
    fn test_slice_rebases() {
        let (document, text, map) = joined();
        let rel = Span::new(6, 16);
        let sub = map.slice(rel);
        assert!(sub.verify(&document, &text[6..16]));
        assert_eq!(sub.pieces().len(), 2);
        assert_eq!(sub.pieces()[0].text_start, 0);
    }

    #[test]
    fn test_turn_from_document() {
        let doc = "Neil: yeah";
        let turn = Turn::from_document("turn_0000", "NEIL", doc, Span::new(6, 10));
        assert_eq!(turn.text, "yeah");
        assert!(turn.matches_document(doc));
        assert_eq!(turn.word_count(), 1);
    }
}
