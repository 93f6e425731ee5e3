//! R-loop detector (§4.3.6): RLFS model-1/model-2 regex hits, filtered by
//! G-fraction and scored by G-run composition.

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::{DetectContext, Detector};
use crate::scan::scan_class;

pub struct RLoopDetector;

fn g_fraction(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let g = seq.iter().filter(|b| b.to_ascii_uppercase() == b'G').count();
    g as f64 / seq.len() as f64
}

fn count_run(seq: &[u8], run: &[u8]) -> usize {
    if seq.len() < run.len() {
        return 0;
    }
    seq.windows(run.len())
        .filter(|w| w.eq_ignore_ascii_case(run))
        .count()
}

/// `perc_g + 0.1*count(GGGG) + 0.05*count(GGG)`, clipped to `[0, 1]`.
pub fn rloop_score(seq: &[u8]) -> f64 {
    let perc_g = g_fraction(seq);
    let gggg = count_run(seq, b"GGGG") as f64;
    let ggg = count_run(seq, b"GGG") as f64;
    (perc_g + 0.1 * gggg + 0.05 * ggg).clamp(0.0, 1.0)
}

impl Detector for RLoopDetector {
    fn class(&self) -> MotifClass {
        MotifClass::RLoop
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        scan_class(ctx.chunk_str, MotifClass::RLoop)
            .into_iter()
            .filter(|hit| g_fraction(ctx.slice(hit.start, hit.end).as_bytes()) >= 0.60)
            .map(|hit| {
                let matched = ctx.slice(hit.start, hit.end);
                let (start, end) = ctx.to_global(hit.start, hit.end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::RLoop,
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
                let score = rloop_score(c.matched_seq.as_bytes());
                c.with_score(score, "RLFS")
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_g_fraction_filter_rejects_low_g() {
        let seq = b"GGGAAAAAAAAAAGGGAAAAAAAAAAGGG";
        assert!(g_fraction(seq) < 0.60);
    }

    #[test]
    fn test_rloop_score_in_range() {
        let seq = b"GGGGAGGGGAGGGGAGGGG";
        let score = rloop_score(seq);
        assert!((0.0..=1.0).contains(&score));
        assert!(score > 0.6);
    }

    #[test]
    fn test_detect_m2_model() {
        let seq = "GGGGAGGGGAGGGGAGGGG";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let candidates = RLoopDetector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
    }
}
