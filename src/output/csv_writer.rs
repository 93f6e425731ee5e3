//! CSV export (§6), the canonical lossless output format every other
//! writer is a projection of. Column order follows `export_utils.py`'s
//! `export_to_csv` field list.

use std::path::Path;

use serde::Serialize;

use crate::candidate::Candidate;
use crate::error::NonBError;

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "S.No")]
    serial: usize,
    #[serde(rename = "Sequence_Name")]
    sequence_name: &'a str,
    #[serde(rename = "Chromosome/Contig")]
    contig: &'a str,
    #[serde(rename = "Class")]
    class: &'a str,
    #[serde(rename = "Subclass")]
    subclass: &'a str,
    #[serde(rename = "Motif_ID")]
    motif_id: usize,
    #[serde(rename = "Start")]
    start: u64,
    #[serde(rename = "End")]
    end: u64,
    #[serde(rename = "Length")]
    length: u64,
    #[serde(rename = "Normalized_Score")]
    normalized_score: String,
    #[serde(rename = "Actual_Score")]
    actual_score: String,
    #[serde(rename = "Scoring_Method")]
    scoring_method: &'a str,
    #[serde(rename = "GC_Content")]
    gc_content: String,
    #[serde(rename = "Sequence")]
    sequence: &'a str,
    #[serde(rename = "Overlap_Classes")]
    overlap_classes: String,
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

/// Writes every candidate to `{prefix}.csv`, one row per candidate, in
/// caller order (the caller is expected to have already sorted by
/// `(sequence_name, start)`).
pub fn write_csv(candidates: &[Candidate], prefix: &Path) -> Result<(), NonBError> {
    let path = prefix.with_extension("csv");
    let mut writer = csv::Writer::from_path(&path).map_err(|source| NonBError::OutputWrite {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::Other, source),
    })?;

    for (i, c) in candidates.iter().enumerate() {
        let row = CsvRow {
            serial: i + 1,
            sequence_name: &c.sequence_name,
            contig: &c.contig,
            class: &c.class_name,
            subclass: c.subclass.as_deref().unwrap_or(""),
            motif_id: c.motif_id,
            start: c.start,
            end: c.end,
            length: c.length,
            normalized_score: fmt_opt(c.normalized_score),
            actual_score: fmt_opt(c.raw_score),
            scoring_method: c.scoring_method.as_deref().unwrap_or(""),
            gc_content: fmt_opt(c.gc_content),
            sequence: &c.matched_seq,
            overlap_classes: c.overlap_classes.join(","),
        };
        writer.serialize(&row)?;
    }
    writer.flush().map_err(|source| NonBError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::candidate::MotifClass;

    #[test]
    fn test_write_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let c = Candidate::new(
            "chr1",
            "chr1",
            MotifClass::GQuadruplex,
            Some("canonical".to_string()),
            0,
            1,
            10,
            "G".repeat(10),
            "g4hunter",
        )
        .with_score(1.8, "g4hunter");
        write_csv(&[c], &prefix).unwrap();

        let mut reader = csv::Reader::from_path(prefix.with_extension("csv")).unwrap();
        let mut iter = reader.records();
        let record = iter.next().unwrap().unwrap();
        assert_eq!(&record[0], "1");
        assert_eq!(&record[3], "g_quadruplex");
    }

    #[test]
    fn test_overlap_classes_comma_joined() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let mut c = Candidate::new(
            "chr1",
            "chr1",
            MotifClass::GQuadruplex,
            None,
            0,
            1,
            10,
            "G".repeat(10),
            "g4hunter",
        );
        c.overlap_classes = vec!["triplex".to_string(), "z_dna".to_string()];
        write_csv(&[c], &prefix).unwrap();

        let mut reader = csv::Reader::from_path(prefix.with_extension("csv")).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[14], "triplex,z_dna");
    }
}
