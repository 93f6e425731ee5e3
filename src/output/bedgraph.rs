//! bedGraph export (§6), adapted from `export_utils.py::create_density_bedgraph`.
//! The source builds a per-base `numpy` array (`O(sequence_length)`
//! memory) and smooths it with a sliding-window convolution; this
//! writer instead reuses the already-computed, fixed-size
//! [`crate::viz::VisualizationSummary::density_bins`] (§4.7 grounding
//! note, DESIGN.md "deviations") — one bedGraph interval per bin,
//! adjacent equal-value bins merged and zero-value bins omitted, same
//! as the source's output shape.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::NonBError;
use crate::viz::VisualizationSummary;

/// Writes `{prefix}.bedgraph` for one `sequence_name` of `total_length`
/// bases, binning `summary.density_bins` evenly across it.
pub fn write_bedgraph(
    summary: &VisualizationSummary,
    sequence_name: &str,
    total_length: u64,
    prefix: &Path,
) -> Result<(), NonBError> {
    let path = prefix.with_extension("bedgraph");
    let file = File::create(&path).map_err(|source| NonBError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let write_err = |source: std::io::Error| NonBError::OutputWrite {
        path: path.clone(),
        source,
    };

    writeln!(
        out,
        "track type=bedGraph name=\"motif density\" description=\"non-B DNA motif density\""
    )
    .map_err(write_err)?;

    let bin_count = summary.density_bins.len().max(1) as u64;
    let bin_width = (total_length.max(1) + bin_count - 1) / bin_count;

    // one (start, end, value) interval per bin
    let intervals: Vec<(u64, u64, u64)> = summary
        .density_bins
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let start = (i as u64) * bin_width;
            let end = (start + bin_width).min(total_length);
            (start, end, value)
        })
        .collect();

    // merge runs of adjacent equal-value bins, dropping zero runs
    let mut i = 0;
    while i < intervals.len() {
        let (run_start, mut run_end, value) = intervals[i];
        let mut j = i + 1;
        while j < intervals.len() && intervals[j].2 == value {
            run_end = intervals[j].1;
            j += 1;
        }
        if value > 0 {
            writeln!(out, "{sequence_name}\t{run_start}\t{run_end}\t{value}").map_err(write_err)?;
        }
        i = j;
    }

    out.flush().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::candidate::MotifClass;
    use crate::viz::VisualizationAccumulator;

    #[test]
    fn test_zero_density_emits_no_lines() {
        let acc = VisualizationAccumulator::new(1000, 10, 200);
        let summary = acc.get_summary();
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        write_bedgraph(&summary, "chr1", 1000, &prefix).unwrap();
        let content = std::fs::read_to_string(prefix.with_extension("bedgraph")).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_nonzero_bin_emits_interval() {
        let mut acc = VisualizationAccumulator::new(1000, 10, 200);
        let c = crate::candidate::Candidate::new(
            "chr1",
            "chr1",
            MotifClass::GQuadruplex,
            None,
            0,
            501,
            520,
            "G".repeat(20),
            "p",
        );
        acc.update(&[c]);
        let summary = acc.get_summary();
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        write_bedgraph(&summary, "chr1", 1000, &prefix).unwrap();
        let content = std::fs::read_to_string(prefix.with_extension("bedgraph")).unwrap();
        assert_eq!(content.lines().count(), 2);
        let line = content.lines().nth(1).unwrap();
        assert!(line.starts_with("chr1\t500\t"));
        assert!(line.ends_with('1'));
    }
}
