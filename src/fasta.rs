//! FASTA ingestion (§6), grounded on `score.rs`'s `bio::io::fasta` use.
//! Each record yields a `(sequence_name, bytes)` pair with whitespace
//! stripped, bases upper-cased, and any byte outside `{A,C,G,T,N}`
//! logged once per record and replaced with `N`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;

use crate::error::NonBError;

/// One ingested FASTA record: `sequence_name` is the record id, `contig`
/// is identical for single-contig records (§6 implementation note), and
/// `bytes` is the upper-cased, sanitized sequence.
pub struct FastaRecord {
    pub sequence_name: String,
    pub contig: String,
    pub bytes: Vec<u8>,
}

fn sanitize(raw: &[u8], record_id: &str) -> Vec<u8> {
    let mut invalid_count = 0usize;
    let sanitized = raw
        .iter()
        .map(|&b| {
            let upper = b.to_ascii_uppercase();
            match upper {
                b'A' | b'C' | b'G' | b'T' | b'N' => upper,
                _ => {
                    invalid_count += 1;
                    b'N'
                }
            }
        })
        .collect();
    if invalid_count > 0 {
        log::warn!(
            "record {record_id}: {invalid_count} invalid base(s) replaced with N"
        );
    }
    sanitized
}

/// Reads every record from `path`, sanitizing sequences per §6.
pub fn read_fasta(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>, NonBError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| NonBError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = fasta::Reader::new(BufReader::new(file));
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| NonBError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let id = record.id().to_string();
        if id.is_empty() {
            return Err(NonBError::InvalidFasta {
                record: "<unknown>".to_string(),
                reason: "empty record id".to_string(),
            });
        }
        let bytes = sanitize(record.seq(), &id);
        records.push(FastaRecord {
            sequence_name: id.clone(),
            contig: id,
            bytes,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_replaces_invalid_bases() {
        let out = sanitize(b"acgtXYZn", "test");
        assert_eq!(out, b"ACGTNNNN");
    }

    #[test]
    fn test_read_fasta_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">seq1 description\nACGTacgtNNNN").unwrap();
        let records = read_fasta(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence_name, "seq1");
        assert_eq!(records[0].bytes, b"ACGTACGTNNNN");
    }

    #[test]
    fn test_empty_fasta_yields_no_records() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let records = read_fasta(file.path()).unwrap();
        assert!(records.is_empty());
    }
}
