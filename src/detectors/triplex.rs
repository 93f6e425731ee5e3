//! Triplex DNA detector (§4.3.5): long homopurine/homopyrimidine tracts
//! scored by purine/pyrimidine fraction plus a length-dependent bonus.

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::{DetectContext, Detector};
use crate::scan::scan_class;

pub struct TriplexDetector;

fn fraction(seq: &[u8], set: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let hits = seq
        .iter()
        .filter(|b| set.contains(&b.to_ascii_uppercase()))
        .count();
    hits as f64 / seq.len() as f64
}

/// `max(purine_fraction, pyrimidine_fraction)` plus a linear ramp bonus
/// saturating at length 30 ([ADDED] resolution, DESIGN.md Open Question 7).
pub fn triplex_stability_score(seq: &[u8]) -> f64 {
    let purine = fraction(seq, b"AG");
    let pyrimidine = fraction(seq, b"CT");
    let base = purine.max(pyrimidine);
    let bonus = 0.1 * (seq.len().min(30) as f64) / 30.0;
    base + bonus
}

impl Detector for TriplexDetector {
    fn class(&self) -> MotifClass {
        MotifClass::Triplex
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        scan_class(ctx.chunk_str, MotifClass::Triplex)
            .into_iter()
            .map(|hit| {
                let matched = ctx.slice(hit.start, hit.end);
                let (start, end) = ctx.to_global(hit.start, hit.end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::Triplex,
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
                let score = triplex_stability_score(c.matched_seq.as_bytes());
                c.with_score(score, "triplex_stability")
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_homopurine_scores_high() {
        let seq = b"AGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAG";
        assert!(triplex_stability_score(seq) > 0.9);
    }

    #[test]
    fn test_length_bonus_saturates() {
        let short = triplex_stability_score(b"AAAAAAAAAAAAAAA");
        let long = triplex_stability_score(&b"A".repeat(60));
        assert!(long >= short);
    }

    #[test]
    fn test_detect_homopurine() {
        let seq = "AGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAG";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let candidates = TriplexDetector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
    }
}
