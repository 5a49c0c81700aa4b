use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Half-open byte range into the original document.
///
/// Every stage reports positions in this one coordinate space so a span
/// produced for a claim can be used to highlight the source text directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Build a span and check it against the document it points into.
    pub fn checked(start: usize, end: usize, document: &str) -> Result<Self> {
        let span = Self { start, end };
        span.validate(document)?;
        Ok(span)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes shared with `other`.
    pub fn overlap(&self, other: &Span) -> usize {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }

    /// Smallest span covering both.
    pub fn union(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift by a base offset (relative -> absolute).
    pub fn offset(&self, base: usize) -> Span {
        Span {
            start: self.start + base,
            end: self.end + base,
        }
    }

    pub fn validate(&self, document: &str) -> Result<()> {
        if self.start > self.end
            || self.end > document.len()
            || !document.is_char_boundary(self.start)
            || !document.is_char_boundary(self.end)
        {
            return Err(Error::InvalidSpan {
                start: self.start,
                end: self.end,
                len: document.len(),
            });
        }
        Ok(())
    }

    /// The text this span covers, or `None` if it does not fit the document.
    pub fn slice<'d>(&self, document: &'d str) -> Option<&'d str> {
        if self.start > self.end {
            return None;
        }
        document.get(self.start..self.end)
    }
}

/// Collapse runs of whitespace so texts assembled from different line
/// breaks can be compared.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_union() {
        let a = Span::new(0, 10);
        let b = Span::new(6, 20);
        assert_eq!(a.overlap(&b), 4);
        assert_eq!(a.union(&b), Span::new(0, 20));
        assert_eq!(a.overlap(&Span::new(10, 12)), 0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let doc = "hello";
        assert!(Span::checked(0, 5, doc).is_ok());
        assert!(Span::checked(3, 2, doc).is_err());
        assert!(Span::checked(0, 6, doc).is_err());
    }

    #[test]
    fn test_validate_rejects_split_char() {
        let doc = "caf\u{e9}";
        assert!(Span::new(0, 4).validate(doc).is_err());
        assert_eq!(Span::new(0, 5).slice(doc), Some("caf\u{e9}"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n b\tc "), "a b c");
    }
}
