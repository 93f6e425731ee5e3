//! GFF3 export (§6), grounded on `export_utils.py::export_to_gff3`:
//! a `##gff-version 3` header, one `##sequence-region` pragma per
//! sequence, then one feature line per candidate with a fixed
//! attribute-key ordering.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::candidate::Candidate;
use crate::error::NonBError;

const SOURCE: &str = "nonbdna";

fn escape_attr(value: &str) -> String {
    value.replace(';', "%3B").replace('=', "%3D").replace(',', "%2C")
}

/// Writes `{prefix}.gff3`. `sequence_lengths` supplies each
/// `sequence_name`'s total length for the `##sequence-region` pragmas;
/// a sequence present in `candidates` but absent from the map falls
/// back to the greatest candidate `end` seen for it.
pub fn write_gff3(
    candidates: &[Candidate],
    prefix: &Path,
    sequence_lengths: &HashMap<String, u64>,
) -> Result<(), NonBError> {
    let path = prefix.with_extension("gff3");
    let file = File::create(&path).map_err(|source| NonBError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let write_err = |source: std::io::Error| NonBError::OutputWrite {
        path: path.clone(),
        source,
    };

    writeln!(out, "##gff-version 3").map_err(write_err)?;

    let mut seen: Vec<&str> = Vec::new();
    for c in candidates {
        if seen.contains(&c.sequence_name.as_str()) {
            continue;
        }
        seen.push(&c.sequence_name);
        let length = sequence_lengths.get(&c.sequence_name).copied().unwrap_or_else(|| {
            candidates
                .iter()
                .filter(|o| o.sequence_name == c.sequence_name)
                .map(|o| o.end)
                .max()
                .unwrap_or(0)
        });
        writeln!(out, "##sequence-region {} 1 {}", c.sequence_name, length).map_err(write_err)?;
    }

    for (i, c) in candidates.iter().enumerate() {
        let score = c
            .normalized_score
            .map(|s| format!("{s:.6}"))
            .unwrap_or_else(|| ".".to_string());

        let mut attrs = vec![
            format!("ID=motif{}", i + 1),
            format!("Name={}_{}", c.class_name, i + 1),
            format!("motif_class={}", escape_attr(&c.class_name)),
        ];
        if let Some(sub) = &c.subclass {
            attrs.push(format!("subclass={}", escape_attr(sub)));
        }
        attrs.push(format!("motif_id={}", c.motif_id));
        if let Some(actual) = c.raw_score {
            attrs.push(format!("actual_score={actual:.6}"));
        }
        if let Some(method) = &c.scoring_method {
            attrs.push(format!("scoring_method={}", escape_attr(method)));
        }
        if let Some(gc) = c.gc_content {
            attrs.push(format!("gc_content={gc:.6}"));
        }
        attrs.push(format!("length={}", c.length));
        if !c.overlap_classes.is_empty() {
            attrs.push(format!("overlaps={}", c.overlap_classes.join(",")));
        }

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t.\t.\t{}",
            c.sequence_name,
            SOURCE,
            c.class_name,
            c.start,
            c.end,
            score,
            attrs.join(";"),
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
    use std::io::BufRead;

    #[test]
    fn test_header_and_sequence_region() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let c = Candidate::new("chr1", "chr1", MotifClass::GQuadruplex, None, 0, 1, 10, "G".repeat(10), "g4hunter")
            .with_score(1.8, "g4hunter");
        let mut lengths = HashMap::new();
        lengths.insert("chr1".to_string(), 1000u64);
        write_gff3(&[c], &prefix, &lengths).unwrap();

        let file = File::open(prefix.with_extension("gff3")).unwrap();
        let mut lines = std::io::BufReader::new(file).lines();
        assert_eq!(lines.next().unwrap().unwrap(), "##gff-version 3");
        assert_eq!(lines.next().unwrap().unwrap(), "##sequence-region chr1 1 1000");
    }

    #[test]
    fn test_attribute_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let mut c = Candidate::new(
            "chr1",
            "chr1",
            MotifClass::GQuadruplex,
            Some("canonical".to_string()),
            3,
            1,
            10,
            "G".repeat(10),
            "g4hunter",
        )
        .with_score(1.8, "g4hunter");
        c.overlap_classes = vec!["triplex".to_string()];
        write_gff3(&[c], &prefix, &HashMap::new()).unwrap();

        let content = std::fs::read_to_string(prefix.with_extension("gff3")).unwrap();
        let feature_line = content.lines().last().unwrap();
        let attrs = feature_line.split('\t').nth(8).unwrap();
        assert!(attrs.starts_with("ID=motif1;Name=g_quadruplex_1;motif_class=g_quadruplex;subclass=canonical;motif_id=3;"));
        assert!(attrs.ends_with("overlaps=triplex"));
    }
}
