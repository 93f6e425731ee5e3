//! G-quadruplex detector (§4.3.1): candidates come from the L1 scan
//! substrate's `g_quadruplex`-tagged patterns (canonical/relaxed/bulged/
//! bipartite), scored with G4Hunter.

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::{DetectContext, Detector};
use crate::scan::scan_class;

pub struct G4Detector;

/// G4Hunter per-base contribution array: each base in a `G`-run of length
/// `k` contributes `+min(k,4)`, each base in a `C`-run contributes
/// `-min(k,4)`, everything else contributes `0.0`.
pub fn g4hunter_track(seq: &[u8]) -> Vec<f64> {
    let mut track = vec![0.0; seq.len()];
    let mut i = 0;
    while i < seq.len() {
        let base = seq[i].to_ascii_uppercase();
        if base == b'G' || base == b'C' {
            let mut j = i;
            while j < seq.len() && seq[j].to_ascii_uppercase() == base {
                j += 1;
            }
            let run_len = j - i;
            let value = run_len.min(4) as f64;
            let signed = if base == b'G' { value } else { -value };
            for slot in track.iter_mut().take(j).skip(i) {
                *slot = signed;
            }
            i = j;
        } else {
            i += 1;
        }
    }
    track
}

/// Mean of the G4Hunter per-base track over the full slice: the candidate's
/// `raw_score`. Positive ≡ G4-forming strand, negative ≡ i-motif strand.
pub fn g4hunter_score(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let track = g4hunter_track(seq);
    track.iter().sum::<f64>() / track.len() as f64
}

impl Detector for G4Detector {
    fn class(&self) -> MotifClass {
        MotifClass::GQuadruplex
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        scan_class(ctx.chunk_str, MotifClass::GQuadruplex)
            .into_iter()
            .map(|hit| {
                let matched = ctx.slice(hit.start, hit.end);
                let (start, end) = ctx.to_global(hit.start, hit.end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::GQuadruplex,
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
                let score = g4hunter_score(c.matched_seq.as_bytes());
                c.with_score(score, "G4Hunter")
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_g4hunter_telomeric() {
        let seq = b"GGGTTAGGGTTAGGGTTAGGG";
        let score = g4hunter_score(seq);
        assert!(score > 0.5, "expected strong G4 signal, got {score}");
    }

    #[test]
    fn test_g4hunter_sign_for_c_rich() {
        let seq = b"CCCTTACCCTTACCCTTACCC";
        assert!(g4hunter_score(seq) < 0.0);
    }

    #[test]
    fn test_detect_and_score_s1() {
        let seq = "GGGTTAGGGTTAGGGTTAGGG";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let detector = G4Detector;
        let candidates = detector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .any(|c| c.subclass.as_deref() == Some("canonical_G4") && c.raw_score.unwrap() > 0.5));
    }
}
