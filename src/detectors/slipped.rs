//! Slipped DNA / STR detector (§4.3.9): tandem direct repeats, a
//! backreference-shaped pattern (`(XXX)\1{n,}`) with no `regex`
//! equivalent, detected entirely through the hand-rolled matcher in
//! `src/fallback.rs` (§4.1/§9).

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::{DetectContext, Detector};
use crate::fallback::find_tandem_repeats;

pub struct SlippedDnaDetector;

/// `length / 100`, normalized across the class later by score normalization.
pub fn slipped_score(length: usize) -> f64 {
    length as f64 / 100.0
}

impl Detector for SlippedDnaDetector {
    fn class(&self) -> MotifClass {
        MotifClass::SlippedDna
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        find_tandem_repeats(ctx.chunk)
            .into_iter()
            .enumerate()
            .map(|(motif_id, hit)| {
                let matched = ctx.slice(hit.start, hit.end);
                let (start, end) = ctx.to_global(hit.start, hit.end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::SlippedDna,
                    Some(format!("unit{}_copies{}", hit.unit_len, hit.copies)),
                    motif_id,
                    start,
                    end,
                    matched,
                    "slipped_tandem_repeat",
                )
            })
            .collect()
    }

    fn score(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .map(|c| {
                let score = slipped_score(c.length as usize);
                c.with_score(score, "str_repeat_length")
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_detect_tri_repeat() {
        let seq = "ATGCGCGCGCGCGCGCGCGCATGC";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let candidates = SlippedDnaDetector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.raw_score.unwrap() > 0.0));
    }

    #[test]
    fn test_detect_mono_repeat() {
        let seq = "TTTTAAAAAAAAAATTTT";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let candidates = SlippedDnaDetector.detect_and_score(&ctx);
        assert!(candidates.iter().any(|c| c.subclass.as_deref() == Some("unit1_copies10")));
    }
}
