//! Orchestrates the full run: FASTA ingestion, per-sequence chunk
//! execution, cross-chunk merge, overlap resolution, hybrid/cluster
//! synthesis, score normalization, the visualization accumulator, and
//! output assembly (§2's data flow, L(-1) through L6). Grounded on
//! `cawlr/src/pipeline/mod.rs`'s orchestration style: one function per
//! pipeline, building up options then running each stage in sequence.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::candidate::Candidate;
use crate::config::{OutputFormat, PipelineOptions};
use crate::error::NonBError;
use crate::executor::{self, PipelineReport};
use crate::fasta::{self, FastaRecord};
use crate::normalize;
use crate::output;
use crate::overlap::{self, OverlapOptions};
use crate::viz::{VisualizationAccumulator, VisualizationSummary};
use crate::{cluster, hybrid};

/// Everything a caller (CLI or embedding library) needs after a run:
/// the candidate count actually written, the partial-failure report
/// (§7's "non-empty `incomplete_chunks` list" contract), and one
/// [`VisualizationSummary`] per input sequence for downstream renderers.
pub struct RunReport {
    pub candidate_count: usize,
    pub report: PipelineReport,
    pub viz_summaries: Vec<(String, VisualizationSummary)>,
}

/// Runs one sequence through L1-L3: chunking, scan+detect+score, and
/// chunk-boundary dedup, returning its resolved-within-itself primary
/// candidates plus whatever failed along the way.
fn run_sequence(record: &FastaRecord, options: &PipelineOptions, spill_root: &std::path::Path) -> (Vec<Candidate>, PipelineReport) {
    let seq_dir = spill_root.join(&record.sequence_name);
    let _ = std::fs::create_dir_all(&seq_dir);

    let (metas, report) = executor::execute(
        &record.bytes,
        &record.sequence_name,
        &record.contig,
        &options.classes,
        options.chunk_size,
        options.workers,
        &seq_dir,
    );
    let candidates = executor::merge_chunks(&metas, options.keep_temp);
    (candidates, report)
}

/// Runs the full pipeline described in §2 over every record in
/// `options.fasta_path`, writing every requested `--formats` output to
/// `{options.out_prefix}.{ext}`.
pub fn run(options: &PipelineOptions) -> Result<RunReport, NonBError> {
    let records = fasta::read_fasta(&options.fasta_path)?;

    let spill_guard = tempfile::Builder::new()
        .prefix("nonbdna_chunks_")
        .tempdir()
        .map_err(|source| NonBError::Io {
            path: std::env::temp_dir(),
            source,
        })?;

    let mut report = PipelineReport::default();
    let mut per_sequence_primary: Vec<(String, u64, Vec<Candidate>)> = Vec::new();
    let mut sequence_lengths: HashMap<String, u64> = HashMap::new();

    for record in &records {
        sequence_lengths.insert(record.sequence_name.clone(), record.bytes.len() as u64);
        let (candidates, seq_report) = run_sequence(record, options, spill_guard.path());
        report.incomplete_chunks.extend(seq_report.incomplete_chunks);
        report.skipped_classes.extend(seq_report.skipped_classes);
        per_sequence_primary.push((record.sequence_name.clone(), record.bytes.len() as u64, candidates));
    }

    let overlap_options = OverlapOptions {
        strategy: options.strategy,
        min_overlap_percent: options.min_overlap_percent,
        same_class_only: options.same_class_only,
        merge_threshold: 0.80,
    };

    let mut all_candidates = Vec::new();
    let mut viz_summaries = Vec::new();

    for (sequence_name, total_length, primary) in per_sequence_primary {
        let resolved = overlap::resolve_overlaps(primary, &overlap_options);
        let mut with_derived = resolved.clone();
        with_derived.extend(hybrid::synthesize_hybrids(&resolved));
        with_derived.extend(cluster::synthesize_clusters(&resolved, cluster::DEFAULT_WINDOW));

        let mut acc = VisualizationAccumulator::new(total_length.max(1), options.bin_count, 10_000);
        acc.update(&with_derived);
        viz_summaries.push((sequence_name, acc.get_summary()));

        all_candidates.extend(with_derived);
    }

    normalize::normalize_scores(&mut all_candidates, options.normalize);
    all_candidates.sort_by(|a, b| a.sequence_name.cmp(&b.sequence_name).then(a.start.cmp(&b.start)));

    // `spill_guard` removes the temp directory on drop unless `--keep-temp`
    // has already promoted each chunk file out of it via `into_path()`
    // below (the per-sequence subdirectories are otherwise emptied by
    // `executor::merge_chunks` as it consumes each spill file).
    if options.keep_temp {
        let _ = spill_guard.into_path();
    }

    write_outputs(&all_candidates, &viz_summaries, &sequence_lengths, options)?;

    Ok(RunReport {
        candidate_count: all_candidates.len(),
        report,
        viz_summaries,
    })
}

fn write_outputs(
    candidates: &[Candidate],
    viz_summaries: &[(String, VisualizationSummary)],
    sequence_lengths: &HashMap<String, u64>,
    options: &PipelineOptions,
) -> Result<(), NonBError> {
    let prefix: PathBuf = options.out_prefix.clone();

    for format in &options.formats {
        match format {
            OutputFormat::Csv => output::write_csv(candidates, &prefix)?,
            OutputFormat::Gff3 => output::write_gff3(candidates, &prefix, sequence_lengths)?,
            OutputFormat::Bed => output::write_bed(candidates, &prefix)?,
            OutputFormat::BedGraph => {
                for (sequence_name, summary) in viz_summaries {
                    let total_length = sequence_lengths.get(sequence_name).copied().unwrap_or(1);
                    let seq_prefix = if viz_summaries.len() > 1 {
                        prefix.with_file_name(format!(
                            "{}.{}",
                            prefix.file_name().and_then(|n| n.to_str()).unwrap_or("out"),
                            sequence_name
                        ))
                    } else {
                        prefix.clone()
                    };
                    output::write_bedgraph(summary, sequence_name, total_length, &seq_prefix)?;
                }
            }
        }
    }
    Ok(())
}
