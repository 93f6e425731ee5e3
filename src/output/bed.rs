//! BED export (§6), grounded on `export_utils.py::export_to_bed`: a
//! fixed per-class RGB palette, 0-based half-open coordinates, and a
//! `{Class}_{Subclass}_{N}` / `{Class}_{N}` name field.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::candidate::Candidate;
use crate::error::NonBError;

fn class_color(class_name: &str) -> &'static str {
    match class_name {
        "curved_dna" => "255,154,162",
        "slipped_dna" => "255,218,193",
        "cruciform" => "226,240,203",
        "r_loop" => "255,211,182",
        "triplex" => "181,234,215",
        "g_quadruplex" => "162,215,216",
        "i_motif" => "176,196,222",
        "z_dna" => "255,183,178",
        "hybrid" => "193,161,146",
        "cluster" => "162,200,204",
        _ => "128,128,128",
    }
}

fn bed_score(c: &Candidate) -> u32 {
    let raw = c
        .normalized_score
        .map(|s| s * 1000.0)
        .unwrap_or_else(|| c.raw_score.unwrap_or(0.0) * 100.0);
    raw.round().clamp(0.0, 1000.0) as u32
}

/// Writes `{prefix}.bed`, one line per candidate, sorted by `(sequence_name, start)`.
pub fn write_bed(candidates: &[Candidate], prefix: &Path) -> Result<(), NonBError> {
    let path = prefix.with_extension("bed");
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
        "track name=\"non-B DNA motifs\" itemRgb=\"On\" visibility=2"
    )
    .map_err(write_err)?;

    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| a.sequence_name.cmp(&b.sequence_name).then(a.start.cmp(&b.start)));

    let mut per_class_counter: fnv::FnvHashMap<String, usize> = fnv::FnvHashMap::default();
    for c in sorted {
        let count = per_class_counter.entry(c.class_name.clone()).or_insert(0);
        *count += 1;
        let name = match &c.subclass {
            Some(sub) => format!("{}_{}_{}", c.class_name, sub, count),
            None => format!("{}_{}", c.class_name, count),
        };
        let start0 = c.start - 1;
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t{}\t{}",
            c.sequence_name,
            start0,
            c.end,
            name,
            bed_score(c),
            start0,
            c.end,
            class_color(&c.class_name),
        )
        .map_err(write_err)?;
    }

    out.flush().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::candidate::MotifClass;

    #[test]
    fn test_bed_coordinates_are_zero_based_half_open() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let c = Candidate::new("chr1", "chr1", MotifClass::GQuadruplex, None, 0, 10, 29, "G".repeat(20), "g4hunter")
            .with_score(1.0, "g4hunter");
        write_bed(&[c], &prefix).unwrap();

        let content = std::fs::read_to_string(prefix.with_extension("bed")).unwrap();
        let line = content.lines().nth(1).unwrap();
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[1], "9");
        assert_eq!(fields[2], "29");
    }

    #[test]
    fn test_bed_name_includes_subclass_and_color_maps_class() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let c = Candidate::new(
            "chr1",
            "chr1",
            MotifClass::GQuadruplex,
            Some("canonical".to_string()),
            0,
            10,
            29,
            "G".repeat(20),
            "g4hunter",
        )
        .with_score(1.0, "g4hunter");
        write_bed(&[c], &prefix).unwrap();

        let content = std::fs::read_to_string(prefix.with_extension("bed")).unwrap();
        let line = content.lines().nth(1).unwrap();
        assert!(line.contains("g_quadruplex_canonical_1"));
        assert!(line.ends_with("162,215,216"));
    }
}
