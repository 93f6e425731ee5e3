//! i-Motif detector (§4.3.2): C-rich mirror of the G4 family, scored with
//! a sign-flipped G4Hunter augmented by a `CCC`-minus-`GGG` run count.

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::g4::g4hunter_track;
use crate::detectors::{DetectContext, Detector};
use crate::scan::scan_class;

pub struct IMotifDetector;

fn count_runs(seq: &[u8], base: u8, min_len: usize) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < seq.len() {
        if seq[i].to_ascii_uppercase() == base {
            let mut j = i;
            while j < seq.len() && seq[j].to_ascii_uppercase() == base {
                j += 1;
            }
            if j - i >= min_len {
                count += 1;
            }
            i = j;
        } else {
            i += 1;
        }
    }
    count
}

/// Sign-flipped mean G4Hunter track (so C-runs score positive) augmented by
/// `(count(CCC) - count(GGG)) / length`, per spec.md §4.3.2.
pub fn imotif_score(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let track = g4hunter_track(seq);
    let mean = -(track.iter().sum::<f64>() / track.len() as f64);
    let ccc = count_runs(seq, b'C', 3) as f64;
    let ggg = count_runs(seq, b'G', 3) as f64;
    mean + (ccc - ggg) / seq.len() as f64
}

impl Detector for IMotifDetector {
    fn class(&self) -> MotifClass {
        MotifClass::IMotif
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        scan_class(ctx.chunk_str, MotifClass::IMotif)
            .into_iter()
            .map(|hit| {
                let matched = ctx.slice(hit.start, hit.end);
                let (start, end) = ctx.to_global(hit.start, hit.end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::IMotif,
                    Some(hit.subclass.to_string()),
                    hit.motif_id,
                    start,
                    end,
                    matched,
                    hit.pattern_name,
                )
            })
            .collect()
    }

    fn score(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .map(|c| {
                let score = imotif_score(c.matched_seq.as_bytes());
                c.with_score(score, "i_motif_adapted_G4Hunter")
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_imotif_c_rich_positive() {
        let seq = b"CCCTTACCCTTACCCTTACCC";
        assert!(imotif_score(seq) > 0.5);
    }

    #[test]
    fn test_detect_and_score() {
        let seq = "CCCTTACCCTTACCCTTACCC";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let detector = IMotifDetector;
        let candidates = detector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.raw_score.unwrap() > 0.0));
    }
}
