//! `PipelineOptions` builder (§6 CLI surface): the configuration struct
//! the CLI populates from `clap`-parsed flags and that `pipeline::run`
//! consumes, following the builder style of `score.rs::ScoreOptions` and
//! `npsmlr/score.rs::ScoreOptions`.

use crate::candidate::MotifClass;
use crate::overlap::OverlapStrategy;

/// `src/normalize.rs`'s two normalization modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizeMode {
    MinMax,
    ZScore,
}

impl std::str::FromStr for NormalizeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minmax" | "min-max" => Ok(NormalizeMode::MinMax),
            "zscore" | "z-score" => Ok(NormalizeMode::ZScore),
            other => Err(format!("unknown normalization mode: {other}")),
        }
    }
}

/// Output format selector for `--formats` (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Gff3,
    Bed,
    BedGraph,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "gff3" => Ok(OutputFormat::Gff3),
            "bed" => Ok(OutputFormat::Bed),
            "bedgraph" => Ok(OutputFormat::BedGraph),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

pub fn all_formats() -> Vec<OutputFormat> {
    vec![
        OutputFormat::Csv,
        OutputFormat::Gff3,
        OutputFormat::Bed,
        OutputFormat::BedGraph,
    ]
}

/// Driving configuration for one pipeline run, built from CLI flags
/// (`src/main.rs`) or directly by an embedding caller.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub fasta_path: std::path::PathBuf,
    pub out_prefix: std::path::PathBuf,
    pub workers: Option<usize>,
    pub chunk_size: usize,
    pub classes: Vec<MotifClass>,
    pub strategy: OverlapStrategy,
    pub min_overlap_percent: f64,
    pub same_class_only: bool,
    pub normalize: NormalizeMode,
    pub bin_count: usize,
    pub keep_temp: bool,
    pub formats: Vec<OutputFormat>,
}

impl PipelineOptions {
    pub fn new(fasta_path: std::path::PathBuf, out_prefix: std::path::PathBuf) -> Self {
        PipelineOptions {
            fasta_path,
            out_prefix,
            workers: None,
            chunk_size: 50_000,
            classes: MotifClass::PRIMARY.to_vec(),
            strategy: OverlapStrategy::HighestScore,
            min_overlap_percent: 0.10,
            same_class_only: true,
            normalize: NormalizeMode::MinMax,
            bin_count: 100,
            keep_temp: false,
            formats: all_formats(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalize_mode_parses() {
        assert_eq!("minmax".parse::<NormalizeMode>().unwrap(), NormalizeMode::MinMax);
        assert_eq!("zscore".parse::<NormalizeMode>().unwrap(), NormalizeMode::ZScore);
        assert!("bogus".parse::<NormalizeMode>().is_err());
    }

    #[test]
    fn test_default_options_use_primary_classes() {
        let opts = PipelineOptions::new("in.fa".into(), "out".into());
        assert_eq!(opts.classes.len(), MotifClass::PRIMARY.len());
        assert_eq!(opts.formats.len(), 4);
    }
}
