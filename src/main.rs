use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use eyre::Result;
use human_panic::setup_panic;

use nonbdna::candidate::MotifClass;
use nonbdna::config::{NormalizeMode, OutputFormat, PipelineOptions};
use nonbdna::overlap::OverlapStrategy;
use nonbdna::pipeline;

/// `--log-level`'s four-level closed enum (§6 CLI surface), rather than
/// `cawlr/src/main.rs`'s `-v`-repetition `clap_verbosity_flag::Verbosity`,
/// since the spec names exactly four levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl LogLevel {
    fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

fn parse_log_level(s: &str) -> std::result::Result<LogLevel, String> {
    LogLevel::from_str(s)
}

fn parse_strategy(s: &str) -> std::result::Result<OverlapStrategy, String> {
    match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
        "highestscore" => Ok(OverlapStrategy::HighestScore),
        "longestmotif" => Ok(OverlapStrategy::LongestMotif),
        "scientificpriority" => Ok(OverlapStrategy::ScientificPriority),
        "mergecompatible" => Ok(OverlapStrategy::MergeCompatible),
        "keepall" => Ok(OverlapStrategy::KeepAll),
        other => Err(format!("unknown overlap strategy: {other}")),
    }
}

fn parse_classes(s: &str) -> std::result::Result<Vec<MotifClass>, String> {
    s.split(',')
        .map(|name| MotifClass::from_str(name.trim()).map_err(|e| e.to_string()))
        .collect()
}

fn parse_formats(s: &str) -> std::result::Result<Vec<OutputFormat>, String> {
    s.split(',')
        .map(|name| OutputFormat::from_str(name.trim()))
        .collect()
}

fn parse_normalize(s: &str) -> std::result::Result<NormalizeMode, String> {
    NormalizeMode::from_str(s)
}

/// Non-B DNA motif discovery over FASTA input (§6 CLI surface).
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Required input FASTA path.
    #[clap(long)]
    fasta: PathBuf,

    /// Output prefix; every `--formats` entry is written to `{out}.{ext}`.
    #[clap(long)]
    out: PathBuf,

    /// Worker count override for the `Hybrid` execution mode.
    #[clap(long)]
    workers: Option<usize>,

    /// Chunk size in base pairs.
    #[clap(long, default_value_t = 50_000)]
    chunk_size: usize,

    /// Comma-separated subset of the eleven class names; default is the
    /// nine primary (non-derived) classes.
    #[clap(long, value_parser = parse_classes)]
    classes: Option<Vec<MotifClass>>,

    /// Overlap resolution strategy.
    #[clap(long, default_value = "highest-score", value_parser = parse_strategy)]
    strategy: OverlapStrategy,

    /// Minimum overlap fraction (of the shorter record) to be considered
    /// overlapping at all.
    #[clap(long, default_value_t = 0.10)]
    min_overlap_percent: f64,

    /// Restrict overlap resolution to same-class conflicts only
    /// (cross-class overlaps are still annotated via `overlap_classes`).
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    same_class_only: bool,

    /// Score normalization mode.
    #[clap(long, default_value = "minmax", value_parser = parse_normalize)]
    normalize: NormalizeMode,

    /// Number of bins for the density/length histograms in the
    /// visualization summary.
    #[clap(long, default_value_t = 100)]
    bin_count: usize,

    /// Retain the per-chunk spill directory after a successful run.
    #[clap(long, default_value_t = false)]
    keep_temp: bool,

    /// Comma-separated output formats.
    #[clap(long, default_value = "csv,gff3,bed,bedgraph", value_parser = parse_formats)]
    formats: Vec<OutputFormat>,

    /// Logging verbosity.
    #[clap(long, default_value = "info", value_parser = parse_log_level)]
    log_level: LogLevel,
}

impl Args {
    fn into_options(self) -> PipelineOptions {
        let mut options = PipelineOptions::new(self.fasta, self.out);
        options.workers = self.workers;
        options.chunk_size = self.chunk_size;
        if let Some(classes) = self.classes {
            options.classes = classes;
        }
        options.strategy = self.strategy;
        options.min_overlap_percent = self.min_overlap_percent;
        options.same_class_only = self.same_class_only;
        options.normalize = self.normalize;
        options.bin_count = self.bin_count;
        options.keep_temp = self.keep_temp;
        options.formats = self.formats;
        options
    }
}

fn main() -> Result<()> {
    setup_panic!();
    jane_eyre::install()?;

    let args = Args::parse();
    let log_level = args.log_level.filter();
    env_logger::Builder::new().filter_level(log_level).init();

    let options = args.into_options();
    let run_report = pipeline::run(&options)?;

    log::info!(
        "wrote {} motifs to {}.*",
        run_report.candidate_count,
        options.out_prefix.display()
    );
    if !run_report.report.incomplete_chunks.is_empty() {
        eprintln!(
            "warning: {} chunk(s) failed and were skipped: {:?}",
            run_report.report.incomplete_chunks.len(),
            run_report.report.incomplete_chunks,
        );
    }
    if !run_report.report.skipped_classes.is_empty() {
        eprintln!(
            "warning: classes skipped due to pattern compilation failure: {:?}",
            run_report.report.skipped_classes
        );
    }

    Ok(())
}
