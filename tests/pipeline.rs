use claimsift::models::normalize_whitespace;
use claimsift::stages::split_sentences;
use claimsift::{
    parse_labeled_lines, ClaimExtractor, ClaimType, ExtractionResult, ExtractorConfig, SentenceType, Span,
};

const WORDS: &[&str] = &[
    "the", "council", "kept", "arguing", "about", "housing", "costs", "and", "nobody", "wanted", "to",
    "admit", "that", "rents", "doubled", "while", "wages", "stayed", "flat",
];

fn unpunctuated(min_chars: usize) -> String {
    let mut out = String::new();
    let mut i = 0;
    while out.len() < min_chars {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(WORDS[i % WORDS.len()]);
        i += 1;
    }
    out
}

fn claim_texts(result: &ExtractionResult) -> Vec<(String, Span, ClaimType)> {
    result
        .claims
        .iter()
        .map(|c| (c.text.clone(), c.span, c.claim_type))
        .collect()
}

#[test]
fn test_stochastic_statement_survives() {
    let doc = "Charles: so there is also stochastic uncertainty in the universe it's built in there's randomness.";
    let result = ClaimExtractor::default().extract(doc);

    assert_eq!(result.turns.len(), 1);
    assert_eq!(result.turns[0].speaker, "CHARLES");
    assert_eq!(result.sentences.len(), 1);
    assert_eq!(result.sentences[0].sentence_type, SentenceType::Statement);

    assert_eq!(result.claims.len(), 1, "{:?}", result.diagnostics);
    let claim = &result.claims[0];
    assert_eq!(claim.claim_type, ClaimType::Factual);
    assert!(claim.text.contains("stochastic"));
    assert!(claim.text.contains("randomness"));
    assert!(claim.should_fact_check);
    assert_eq!(claim.speaker, "CHARLES");
    assert_eq!(claim.span.slice(doc), Some(claim.text.as_str()));
}

#[test]
fn test_backchannel_yields_no_claim() {
    let result = ClaimExtractor::default().extract("Neil: yeah");

    assert_eq!(result.turns.len(), 1);
    assert_eq!(result.turns[0].speaker, "NEIL");
    assert_eq!(result.sentences.len(), 1);
    assert_eq!(result.sentences[0].sentence_type, SentenceType::Fragment);
    assert!(result.claims.is_empty());

    let d = &result.diagnostics;
    assert_eq!(d.sentences_gated_out.get("fragment"), Some(&1));
    assert_eq!(d.raw_claims, 0);
    assert!(d.examples.get("gate:fragment").is_some_and(|e| e.iter().any(|t| t == "yeah")));
}

#[test]
fn test_oversized_paragraph_is_split_exactly() {
    let body = unpunctuated(3000);
    let doc = format!("ALICE: {}", body);
    let result = ClaimExtractor::default().extract(&doc);

    assert!(result.turns.len() >= 2);
    assert!(result.diagnostics.failsafe_splits >= 1);
    assert_eq!(result.diagnostics.failsafe_fallbacks, 0);

    for turn in &result.turns {
        assert_eq!(turn.span.slice(&doc), Some(turn.text.as_str()));
        assert_eq!(turn.speaker, "ALICE");
    }
    let rebuilt: Vec<&str> = result.turns.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt.join(" "), body);

    let first = result.turns.first().map(|t| t.span.start);
    let last = result.turns.last().map(|t| t.span.end);
    assert_eq!(first, Some(7));
    assert_eq!(last, Some(doc.len()));
}

#[test]
fn test_anchor_rescue_end_to_end() {
    let extractor = ClaimExtractor::default();

    let short = extractor.extract("ALICE: The program has cost taxpayers.");
    assert!(short.claims.is_empty());

    let anchored = extractor.extract("ALICE: The program has cost taxpayers $22 billion.");
    assert_eq!(anchored.claims.len(), 1, "{:?}", anchored.diagnostics);
    assert!(anchored.claims[0].text.ends_with("$22 billion."));
    assert_eq!(anchored.claims[0].claim_type, ClaimType::Statistical);
}

#[test]
fn test_short_anchored_claims_survive() {
    let extractor = ClaimExtractor::default();
    for body in [
        "Unemployment fell to 3.5% in 2019.",
        "Prices rose 30% last year.",
        "Texas lost 40,000 jobs in 2020.",
        "Wages grew 3% last year.",
        "The plan cut taxes by 10% in 2017.",
        "Inflation hit 9% in 2022.",
    ] {
        let doc = format!("SMITH: {}", body);
        let result = extractor.extract(&doc);
        assert_eq!(result.sentences[0].sentence_type, SentenceType::Statement, "{}", body);
        assert_eq!(result.claims.len(), 1, "{}: {:?}", body, result.diagnostics.claims_filtered_out);
        assert_eq!(result.claims[0].text, body);
        assert_eq!(result.claims[0].claim_type, ClaimType::Statistical);
    }
}

#[test]
fn test_failsafe_keeps_words_before_repeated_run() {
    let run = |n: usize| WORDS.iter().cycle().take(n).copied().collect::<Vec<_>>().join(" ");
    let first = run(120).replacen("about ", "about  ", 1);
    let body = format!("{} {} {}", first, run(120), run(30));
    let doc = format!("ALICE: {}", body);
    let result = ClaimExtractor::default().extract(&doc);

    assert_eq!(result.diagnostics.failsafe_fallbacks, 0);
    assert_eq!(result.turns.first().map(|t| t.span.start), Some(7));
    assert_eq!(result.turns.last().map(|t| t.span.end), Some(doc.len()));
    let words: usize = result.turns.iter().map(|t| t.text.split_whitespace().count()).sum();
    assert_eq!(words, 270);
    for turn in &result.turns {
        assert!(!turn.text.is_empty());
        assert_eq!(turn.span.slice(&doc), Some(turn.text.as_str()));
    }
}

#[test]
fn test_same_sentence_claims_merge() {
    let doc = "BOB: Unemployment has dropped 4% because of the tax cuts.";
    let result = ClaimExtractor::default().extract(doc);

    assert!(result.diagnostics.raw_claims >= 2);
    assert!(result.diagnostics.merges >= 1);
    assert_eq!(result.claims.len(), 1);

    let claim = &result.claims[0];
    assert_eq!(claim.claim_type, ClaimType::Statistical);
    assert_eq!(claim.span, result.sentences[0].span);
    assert_eq!(claim.context, claim.text);
}

#[test]
fn test_sentence_spans_point_into_document() {
    let doc = "MODERATOR: Welcome back to the debate.\n\
               SMITH: Crime fell 10% in 2019. We hired 2,000 officers.\n\
               JONES: That is misleading. Crime rose in 2021 because of the pandemic.\n";
    let result = ClaimExtractor::default().extract(doc);

    assert_eq!(result.diagnostics.span_mismatches, 0);
    assert!(!result.sentences.is_empty());
    for sentence in &result.sentences {
        assert_eq!(sentence.span.slice(doc).map(str::trim), Some(sentence.text.trim()));
    }
    for claim in &result.claims {
        assert_eq!(claim.span.slice(doc), Some(claim.text.as_str()));
    }
    let speakers: Vec<&str> = result.turns.iter().map(|t| t.speaker.as_str()).collect();
    assert_eq!(speakers, vec!["MODERATOR", "SMITH", "JONES"]);
}

#[test]
fn test_joined_lines_keep_exact_spans() {
    let doc = "SMITH: Crime fell 10% in 2019 and\nkept falling after we hired 2,000 officers.\n";
    let result = ClaimExtractor::default().extract(doc);

    assert_eq!(result.turns.len(), 1);
    assert_eq!(result.diagnostics.span_mismatches, 0);
    for sentence in &result.sentences {
        let slice = sentence.span.slice(doc).map(normalize_whitespace);
        assert_eq!(slice, Some(normalize_whitespace(&sentence.text)));
    }
}

#[test]
fn test_continuous_turns_are_monotonic() {
    let doc = "The deficit tripled under the last administration. Spending rose every single year. \
               Well, that is simply not true. The deficit fell in 2019. \
               No, the numbers are clear. Thank you. Thank you both, now let us turn to healthcare.";
    let result = ClaimExtractor::default().extract(doc);

    assert_eq!(result.diagnostics.input_mode, "continuous");
    assert!(result.turns.len() >= 2);
    for pair in result.turns.windows(2) {
        assert!(pair[0].span.start < pair[1].span.start);
        assert!(pair[0].span.end <= pair[1].span.start);
    }
    for turn in &result.turns {
        assert_eq!(turn.span.slice(doc), Some(turn.text.as_str()));
    }
}

#[test]
fn test_splitter_covers_document() {
    let doc = "  Dr. Smith arrived at 3 p.m. on Friday.  Was he late?\nNo! He was early...   Then what?";
    let sentences = split_sentences(doc);
    assert!(sentences.len() >= 3);

    let mut cursor = 0;
    for sentence in &sentences {
        assert!(sentence.span.start >= cursor);
        assert!(doc[cursor..sentence.span.start].trim().is_empty());
        assert_eq!(&doc[sentence.span.start..sentence.span.end], sentence.text);
        cursor = sentence.span.end;
    }
    assert!(doc[cursor..].trim().is_empty());
}

#[test]
fn test_runs_are_deterministic() {
    let doc = "SMITH: Crime fell 10% in 2019. We should be proud of that.\n\
               JONES: Crime rose in 2021 because of the pandemic. Imports are higher than exports now.\n";
    let extractor = ClaimExtractor::default();
    let first = extractor.extract(doc);
    let second = extractor.extract(doc);

    assert_eq!(claim_texts(&first), claim_texts(&second));
    assert_eq!(first.diagnostics.claims_filtered_out, second.diagnostics.claims_filtered_out);
    assert!(first.claims.iter().all(|c| !c.id.is_empty()));
}

#[test]
fn test_normative_claims_are_not_fact_checked() {
    let doc = "SMITH: We should never have spent 22 billion dollars on that program.";
    let result = ClaimExtractor::default().extract(doc);

    assert_eq!(result.claims.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.claims[0].claim_type, ClaimType::Normative);
    assert!(!result.claims[0].should_fact_check);
    assert!(result.diagnostics.reclassified >= 1);
}

#[test]
fn test_shared_extractor_across_threads() {
    let docs: Vec<String> = (0..8)
        .map(|i| format!("SPEAKER{}: Crime fell {}% in 2019 because of new policing.\nOTHER: yeah", i, i + 5))
        .collect();
    let extractor = ClaimExtractor::new(ExtractorConfig::default()).unwrap();

    let sequential: Vec<_> = docs.iter().map(|d| claim_texts(&extractor.extract(d))).collect();
    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = docs
            .iter()
            .map(|d| {
                let extractor = &extractor;
                scope.spawn(move || claim_texts(&extractor.extract(d)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
    assert!(sequential.iter().all(|claims| claims.len() == 1));
}

#[test]
fn test_utterance_input() {
    let parsed = claimsift::parse_records_json(
        r#"[{"speaker": "Sen. Warren", "text": "Drug prices increased 30% between 2015 and 2020.", "source_line": 1}]"#,
    )
    .unwrap();
    let result = ClaimExtractor::default().extract_utterances(&parsed.document, &parsed.utterances);

    assert_eq!(result.diagnostics.input_mode, "utterances");
    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.claims[0].speaker, "WARREN");
    assert_eq!(result.claims[0].span.slice(&parsed.document), Some(result.claims[0].text.as_str()));
}

#[test]
fn test_labeled_parse_matches_extract() {
    let doc = "ALICE: Wages grew 3% last year.\nBOB: Prices grew faster than wages.";
    let parsed = parse_labeled_lines(doc);
    let extractor = ClaimExtractor::default();
    assert_eq!(
        claim_texts(&extractor.extract(doc)),
        claim_texts(&extractor.extract_utterances(doc, &parsed.utterances))
    );
}
