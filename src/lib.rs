pub mod detectors;
pub mod error;
pub mod filters;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use detectors::{default_detectors, ClaimDetector};
pub use error::{Error, Result};
pub use filters::{ClaimFilter, FilterChain, FilterConfig, SponsorState};
pub use io::{
    parse_labeled_lines, parse_records_json, read_records_file, read_transcript_file, ClaimReport, HumanReport,
    ParsedTranscript, UtteranceRecord,
};
pub use models::{
    Claim, ClaimAnnotation, ClaimCore, ClaimType, ClassifiedSentence, Diagnostics, FactCheckRequest,
    FallacyRequest, Participant, SentenceType, Span, Turn, Utterance,
};
pub use pipeline::{ClaimExtractor, ExtractionResult, ExtractorConfig};
