use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::detectors::{default_detectors, ClaimDetector};
use crate::error::{Error, Result};
use crate::filters::{FilterChain, FilterConfig, SponsorState};
use crate::io::parse_labeled_lines;
use crate::models::{Claim, ClassifiedSentence, Diagnostics, Turn, Utterance};
use crate::stages::{
    apply_failsafe, chunk_utterances, detect_claims, detect_turns, filter_claims, gate_sentences, postprocess,
    segment_turns, ChunkerConfig, ClaimGate, ClassifierConfig, ContextIndex, FailsafeConfig, GateConfig,
    PostprocessConfig, SentenceClassifier, TurnDetectorConfig,
};

/// Every tunable of the extractor, one section per stage.
///
/// Deserializes from partial JSON: missing sections and fields keep their
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub turns: TurnDetectorConfig,
    pub chunker: ChunkerConfig,
    pub failsafe: FailsafeConfig,
    pub classifier: ClassifierConfig,
    pub gate: GateConfig,
    pub filters: FilterConfig,
    pub postprocess: PostprocessConfig,
    /// Example texts kept per rejection reason in diagnostics
    pub max_examples: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            turns: TurnDetectorConfig::default(),
            chunker: ChunkerConfig::default(),
            failsafe: FailsafeConfig::default(),
            classifier: ClassifierConfig::default(),
            gate: GateConfig::default(),
            filters: FilterConfig::default(),
            postprocess: PostprocessConfig::default(),
            max_examples: 3,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::invalid_config(format!("{} must be within [0, 1], got {}", name, value)));
    }
    Ok(())
}

fn check_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(Error::invalid_config(format!("{} must be greater than 0", name)));
    }
    Ok(())
}

impl ExtractorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid config: {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("turns.boundary_threshold", self.turns.boundary_threshold)?;
        check_positive("turns.max_turn_sentences", self.turns.max_turn_sentences)?;
        for weight in [
            self.turns.question_shift_weight,
            self.turns.discourse_marker_weight,
            self.turns.direct_address_weight,
            self.turns.stage_direction_weight,
            self.turns.courtesy_weight,
        ] {
            check_unit("turns signal weight", weight)?;
        }

        check_positive("failsafe.max_turn_chars", self.failsafe.max_turn_chars)?;
        check_positive("failsafe.unpunctuated_word_limit", self.failsafe.unpunctuated_word_limit)?;
        check_positive("failsafe.token_budget", self.failsafe.token_budget)?;

        check_unit("classifier.fragment_threshold", self.classifier.fragment_threshold)?;
        check_unit("classifier.filler_ratio", self.classifier.filler_ratio)?;
        check_positive("classifier.run_on_chars", self.classifier.run_on_chars)?;

        if self.filters.anchor_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::invalid_config("filters.anchor_terms contains an empty term"));
        }

        check_unit("postprocess.overlap_threshold", self.postprocess.overlap_threshold)?;
        if self.postprocess.overlap_threshold >= 1.0 {
            return Err(Error::invalid_config("postprocess.overlap_threshold must be below 1"));
        }
        Ok(())
    }
}

/// Everything one extraction run produced.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Final claims ordered by span start, type priority and id
    pub claims: Vec<Claim>,
    pub turns: Vec<Turn>,
    pub sentences: Vec<ClassifiedSentence>,
    pub diagnostics: Diagnostics,
}

impl ExtractionResult {
    fn empty(diagnostics: Diagnostics) -> Self {
        Self {
            claims: Vec::new(),
            turns: Vec::new(),
            sentences: Vec::new(),
            diagnostics,
        }
    }
}

/// Runs the whole pipeline over one document at a time.
///
/// Holds only immutable configuration and compiled rules, so one extractor
/// can be shared across threads; per-run state lives on the stack of each
/// call.
pub struct ClaimExtractor {
    config: ExtractorConfig,
    classifier: SentenceClassifier,
    gate: ClaimGate,
    detectors: Vec<Box<dyn ClaimDetector>>,
    chain: FilterChain,
}

impl std::fmt::Debug for ClaimExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimExtractor")
            .field("config", &self.config)
            .field("detectors", &self.detectors.iter().map(|d| d.name()).collect::<Vec<_>>())
            .field("chain", &self.chain)
            .finish()
    }
}

impl ClaimExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: SentenceClassifier::new(config.classifier.clone()),
            gate: ClaimGate::new(config.gate.clone()),
            detectors: default_detectors(),
            chain: FilterChain::new(&config.filters),
            config,
        })
    }

    /// Replace the detector set.
    pub fn with_detectors(mut self, detectors: Vec<Box<dyn ClaimDetector>>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn diagnostics(&self, mode: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new(self.config.max_examples);
        diagnostics.input_mode = mode.to_string();
        diagnostics
    }

    /// Labeled path if any line names its speaker, continuous otherwise.
    pub fn extract(&self, document: &str) -> ExtractionResult {
        let parsed = parse_labeled_lines(document);
        if parsed.is_labeled() {
            self.run_utterances(document, &parsed.utterances, self.diagnostics("labeled"))
        } else {
            self.extract_continuous(document)
        }
    }

    /// Treat every line as an utterance, labeled or not.
    pub fn extract_labeled(&self, document: &str) -> ExtractionResult {
        let parsed = parse_labeled_lines(document);
        self.run_utterances(document, &parsed.utterances, self.diagnostics("labeled"))
    }

    /// Utterances parsed elsewhere; their spans must point into `document`.
    pub fn extract_utterances(&self, document: &str, utterances: &[Utterance]) -> ExtractionResult {
        self.run_utterances(document, utterances, self.diagnostics("utterances"))
    }

    /// Unlabeled prose: turns come from the boundary detector.
    pub fn extract_continuous(&self, document: &str) -> ExtractionResult {
        let mut diagnostics = self.diagnostics("continuous");
        if document.trim().is_empty() {
            diagnostics.note("Empty document: nothing to extract");
            return ExtractionResult::empty(diagnostics);
        }

        let detection = detect_turns(document, &self.config.turns);
        if detection.forced_boundaries > 0 {
            diagnostics.note(format!(
                "{} turn boundaries forced by the {}-sentence limit",
                detection.forced_boundaries, self.config.turns.max_turn_sentences
            ));
        }
        self.run_turns(document, detection.turns, diagnostics)
    }

    fn run_utterances(
        &self,
        document: &str,
        utterances: &[Utterance],
        mut diagnostics: Diagnostics,
    ) -> ExtractionResult {
        diagnostics.utterances_in = utterances.len();
        if utterances.is_empty() {
            diagnostics.note("No utterances found: nothing to extract");
            return ExtractionResult::empty(diagnostics);
        }

        for utterance in utterances {
            if utterance.span.slice(document) != Some(utterance.text.as_str()) {
                warn!(
                    "Utterance on line {} does not match document at {:?}",
                    utterance.source_line, utterance.span
                );
                diagnostics.span_mismatches += 1;
            }
        }

        let chunked = chunk_utterances(utterances, &self.config.chunker);
        if chunked.dropped_short > 0 {
            diagnostics.note(format!(
                "{} turns shorter than {} characters dropped",
                chunked.dropped_short, self.config.chunker.min_turn_chars
            ));
        }
        self.run_turns(document, chunked.turns, diagnostics)
    }

    fn run_turns(&self, document: &str, turns: Vec<Turn>, mut diagnostics: Diagnostics) -> ExtractionResult {
        let failsafe = apply_failsafe(turns, &self.config.failsafe);
        diagnostics.failsafe_splits += failsafe.split_turns;
        diagnostics.failsafe_fallbacks += failsafe.relocation_failures;
        diagnostics.messages.extend(failsafe.messages);

        let turns = failsafe.turns;
        diagnostics.turns_created = turns.len();
        if turns.is_empty() {
            diagnostics.note("No turns found: nothing to extract");
            return ExtractionResult::empty(diagnostics);
        }

        let sentences = segment_turns(document, &turns, &self.classifier, &mut diagnostics);
        let gated = gate_sentences(&sentences, &self.gate, &mut diagnostics);
        if gated.is_empty() {
            diagnostics.note("No sentences passed the claim gate");
        }

        let raw = detect_claims(&gated, &self.detectors, &mut diagnostics);
        let contexts = ContextIndex::new(&sentences, self.config.filters.context_window_chars);
        let mut sponsor = SponsorState::new();
        let filtered = filter_claims(raw, &contexts, &self.chain, &mut sponsor, &mut diagnostics);
        let claims = postprocess(filtered, &sentences, &self.config.postprocess, &mut diagnostics);

        if claims.is_empty() && !gated.is_empty() {
            diagnostics.note("No claims survived detection and filtering");
        }

        info!(
            "Extraction complete ({}): {} turns, {} sentences, {} raw claims, {} final claims",
            diagnostics.input_mode,
            turns.len(),
            sentences.len(),
            diagnostics.raw_claims,
            claims.len()
        );

        ExtractionResult {
            claims,
            turns,
            sentences,
            diagnostics,
        }
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self {
            classifier: SentenceClassifier::default(),
            gate: ClaimGate::new(GateConfig::default()),
            detectors: default_detectors(),
            chain: FilterChain::default(),
            config: ExtractorConfig::default(),
        }
    }
}
