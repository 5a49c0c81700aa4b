use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::detectors::ClaimDetector;
use crate::models::{ClaimCore, ClassifiedSentence, Diagnostics};

/// Run every detector over every gated sentence.
///
/// A detector that fails on one sentence is skipped for that sentence only;
/// the failure is logged and counted.
pub fn detect_claims(
    sentences: &[&ClassifiedSentence],
    detectors: &[Box<dyn ClaimDetector>],
    diagnostics: &mut Diagnostics,
) -> Vec<ClaimCore> {
    let mut claims = Vec::new();

    for sentence in sentences {
        for detector in detectors {
            match detector.detect(sentence) {
                Ok(Some(claim)) => claims.push(claim),
                Ok(None) => {}
                Err(e) => {
                    warn!("Detector {} failed on {}: {}", detector.name(), sentence.id, e);
                    diagnostics.detector_errors += 1;
                }
            }
        }
    }

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for claim in &claims {
        *by_type.entry(claim.claim_type.as_str()).or_default() += 1;
    }
    info!(
        "Detected {} raw claims across {} sentences: {:?}",
        claims.len(),
        sentences.len(),
        by_type
    );

    diagnostics.raw_claims += claims.len();
    claims
}
