//! Rule-based claim detectors.
//!
//! Each detector looks at one gated sentence and emits at most one claim of
//! its own type. Confidence comes from a [`WeightedSignals`] table so the
//! constants live next to the patterns they weigh.
//!
//! [`WeightedSignals`]: crate::heuristics::WeightedSignals

pub mod causal;
pub mod comparative;
pub mod factual;
pub mod historical;
pub mod statistical;

pub use causal::*;
pub use comparative::*;
pub use factual::*;
pub use historical::*;
pub use statistical::*;

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{ClaimCore, ClaimType, ClassifiedSentence};

/// A claim detector. Implementations must be stateless so one set can be
/// shared across threads.
pub trait ClaimDetector: Send + Sync {
    /// Stable name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    fn claim_type(&self) -> ClaimType;

    /// Emit a claim for `sentence`, or `None` when nothing of this type is
    /// present.
    fn detect(&self, sentence: &ClassifiedSentence) -> Result<Option<ClaimCore>>;
}

/// The five detectors in run order, most specific first.
pub fn default_detectors() -> Vec<Box<dyn ClaimDetector>> {
    vec![
        Box::new(StatisticalDetector::new()),
        Box::new(CausalDetector::new()),
        Box::new(ComparativeDetector::new()),
        Box::new(HistoricalDetector::new()),
        Box::new(FactualDetector::new()),
    ]
}

/// Lowercased sentence text, or an error for a sentence with no text.
pub(crate) fn detection_text(detector: &str, sentence: &ClassifiedSentence) -> Result<String> {
    let text = sentence.text.trim();
    if text.is_empty() {
        return Err(Error::detector(detector, format!("sentence {} has no text", sentence.id)));
    }
    Ok(text.to_lowercase())
}

pub(crate) fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid detector pattern"))
        .collect()
}

/// Number of patterns that match at least once.
pub(crate) fn count_patterns(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().filter(|p| p.is_match(text)).count()
}
