//! Cruciform DNA detector (§4.3.7): inverted-repeat (palindrome) scan, a
//! backreference-shaped pattern with no `regex` equivalent, so detection
//! runs entirely through the hand-rolled matcher in `src/fallback.rs`
//! (§4.1/§9).

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::{DetectContext, Detector};
use crate::fallback::find_palindromes;

pub struct CruciformDetector;

/// `length / 100`, normalized across the class later by score normalization.
pub fn cruciform_score(length: usize) -> f64 {
    length as f64 / 100.0
}

impl Detector for CruciformDetector {
    fn class(&self) -> MotifClass {
        MotifClass::Cruciform
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        find_palindromes(ctx.chunk)
            .into_iter()
            .enumerate()
            .map(|(motif_id, hit)| {
                let matched = ctx.slice(hit.start, hit.end);
                let (start, end) = ctx.to_global(hit.start, hit.end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::Cruciform,
                    Some(format!("arm{}_loop{}", hit.arm_len, hit.loop_len)),
                    motif_id,
                    start,
                    end,
                    matched,
                    "cruciform_palindrome",
                )
            })
            .collect()
    }

    fn score(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .map(|c| {
                let score = cruciform_score(c.length as usize);
                c.with_score(score, "cruciform_palindrome_length")
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_detect_palindrome() {
        let seq = "AAACCCGGGGATTACAGATTACANNNTGTAATCTGTAATC";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let candidates = CruciformDetector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.raw_score.unwrap() > 0.0));
    }
}
