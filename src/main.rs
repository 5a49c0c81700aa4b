use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use claimsift::models::parse_participants_string;
use claimsift::{
    read_records_file, read_transcript_file, ClaimExtractor, ClaimReport, ExtractionResult, ExtractorConfig,
    HumanReport,
};

#[derive(Parser)]
#[command(name = "claimsift")]
#[command(author, version, about = "Claim extraction for debate transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Labeled path if any line names a speaker, continuous otherwise
    Auto,
    /// Every line is an utterance
    Labeled,
    /// Unlabeled prose; turns are detected
    Continuous,
    /// JSON array of {speaker, text, source_line} records
    Records,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract claims from one or more transcripts
    Extract {
        /// Input transcript files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the JSON reports
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Also write a human-readable listing next to each report
        #[arg(long)]
        human_readable: bool,

        /// JSON config file; missing fields keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Known participants: "Charlie Kirk=Charlie|Kirk, Tom Smith"
        #[arg(short, long)]
        participants: Option<String>,

        #[arg(short, long, value_enum, default_value = "auto")]
        format: InputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print stage statistics for a transcript without writing reports
    Analyze {
        /// Input transcript file
        input: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        participants: Option<String>,

        #[arg(short, long, value_enum, default_value = "auto")]
        format: InputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            inputs,
            output_dir,
            human_readable,
            config,
            participants,
            format,
            verbose,
        } => {
            setup_logging(verbose);
            let extractor = build_extractor(config.as_deref(), participants.as_deref())?;
            extract_files(Arc::new(extractor), inputs, output_dir, human_readable, format).await
        }
        Commands::Analyze {
            input,
            config,
            participants,
            format,
            verbose,
        } => {
            setup_logging(verbose);
            let extractor = build_extractor(config.as_deref(), participants.as_deref())?;
            let result = run_file(&extractor, &input, format)?;
            print_analysis(&input, &result);
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_extractor(config: Option<&Path>, participants: Option<&str>) -> Result<ClaimExtractor> {
    let mut config = match config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            ExtractorConfig::from_json_file(path)?
        }
        None => ExtractorConfig::default(),
    };
    if let Some(list) = participants {
        config.turns.participants = parse_participants_string(list);
        info!("{} known participants", config.turns.participants.len());
    }
    ClaimExtractor::new(config).context("Invalid extractor configuration")
}

fn run_file(extractor: &ClaimExtractor, path: &Path, format: InputFormat) -> Result<ExtractionResult> {
    info!("Loading transcript from {:?}", path);
    let result = match format {
        InputFormat::Records => {
            let parsed = read_records_file(path)?;
            extractor.extract_utterances(&parsed.document, &parsed.utterances)
        }
        InputFormat::Auto => extractor.extract(&read_transcript_file(path)?),
        InputFormat::Labeled => extractor.extract_labeled(&read_transcript_file(path)?),
        InputFormat::Continuous => extractor.extract_continuous(&read_transcript_file(path)?),
    };
    Ok(result)
}

fn report_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string())
}

async fn extract_files(
    extractor: Arc<ClaimExtractor>,
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    human_readable: bool,
    format: InputFormat,
) -> Result<()> {
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut tasks = JoinSet::new();
    for input in inputs {
        let extractor = Arc::clone(&extractor);
        let output_dir = output_dir.clone();
        tasks.spawn_blocking(move || -> Result<(PathBuf, usize)> {
            let result = run_file(&extractor, &input, format)?;
            let source = input.display().to_string();
            let stem = report_stem(&input);

            let json_path = output_dir.join(format!("{}.claims.json", stem));
            ClaimReport::from_result(&source, &result).write_json(&json_path)?;
            if human_readable {
                let text_path = output_dir.join(format!("{}.claims.txt", stem));
                HumanReport::new(&source, &result).write_file(&text_path)?;
            }
            for message in &result.diagnostics.messages {
                info!("{}: {}", source, message);
            }
            Ok((json_path, result.claims.len()))
        });
    }

    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined.context("Extraction task panicked")? {
            Ok((path, claims)) => info!("{} claims written to {:?}", claims, path),
            Err(e) => {
                warn!("Extraction failed: {:#}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} input(s) failed", failures);
    }
    Ok(())
}

fn print_analysis(input: &Path, result: &ExtractionResult) {
    let d = &result.diagnostics;

    println!("Transcript Analysis: {}", input.display());
    println!("==================");
    println!("Input mode: {}", d.input_mode);
    println!("Utterances: {}", d.utterances_in);
    println!(
        "Turns: {} ({} failsafe splits, {} fallbacks)",
        d.turns_created, d.failsafe_splits, d.failsafe_fallbacks
    );
    println!("Span mismatches: {}", d.span_mismatches);
    println!();

    println!("Sentences");
    println!("---------");
    println!("Total: {} ({} flagged for repair)", d.sentences_total, d.repair_candidates);
    for (sentence_type, count) in &d.sentences_by_type {
        println!("  {}: {}", sentence_type, count);
    }
    for (reason, count) in &d.sentences_gated_out {
        println!("  gated out ({}): {}", reason, count);
    }
    println!();

    println!("Claims");
    println!("------");
    println!("Raw: {} ({} detector errors)", d.raw_claims, d.detector_errors);
    for (filter, count) in &d.claims_filtered_out {
        println!("  filtered by {}: {}", filter, count);
    }
    println!(
        "Rescued: {}, reclassified: {}, filter errors: {}",
        d.rescued, d.reclassified, d.filter_errors
    );
    println!("Duplicates removed: {}, merges: {}", d.duplicates_removed, d.merges);
    println!("Final: {}", d.final_claims);

    let mut speakers: Vec<&str> = result.claims.iter().map(|c| c.speaker.as_str()).collect();
    speakers.sort();
    speakers.dedup();
    for speaker in speakers {
        let count = result.claims.iter().filter(|c| c.speaker == speaker).count();
        println!("  {}: {}", speaker, count);
    }

    if !d.messages.is_empty() {
        println!();
        for message in &d.messages {
            println!("note: {}", message);
        }
    }
}
