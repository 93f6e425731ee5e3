//! Z-DNA detector (§4.3.3): dinucleotide transition scoring plus a
//! modified Kadane maximum-subarray scan that emits multiple local maxima
//! rather than a single global one (§9 design note), grounded on the
//! source's `zdna_calculator.py::subarrays_above_threshold`.

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::{DetectContext, Detector};

/// Transition-scoring parameters, transcribed verbatim from the source's
/// `constants.py::Params` defaults (SPEC_FULL.md §4.3.3 table).
#[derive(Clone, Copy, Debug)]
pub struct ZDnaParams {
    pub gc_weight: f64,
    pub at_weight: f64,
    pub gt_weight: f64,
    pub ac_weight: f64,
    pub cadence_reward: f64,
    pub mismatch_penalty_starting_value: f64,
    pub mismatch_penalty_linear_delta: f64,
    pub exponential_penalty: bool,
    pub threshold: f64,
    pub drop_threshold: f64,
    pub consecutive_at_scoring: [f64; 3],
}

impl Default for ZDnaParams {
    fn default() -> Self {
        ZDnaParams {
            gc_weight: 3.0,
            at_weight: 1.0,
            gt_weight: 2.0,
            ac_weight: 2.0,
            cadence_reward: 0.2,
            mismatch_penalty_starting_value: 3.0,
            mismatch_penalty_linear_delta: 1.0,
            exponential_penalty: false,
            threshold: 5.0,
            drop_threshold: 50.0,
            consecutive_at_scoring: [3.0, 1.5, 0.7],
        }
    }
}

const MISMATCH_PENALTY_CAP: f64 = 32_000.0;

/// Per-transition scoring array of length `seq.len() - 1`.
fn transition_scores(seq: &[u8], params: &ZDnaParams) -> Vec<f64> {
    if seq.len() < 2 {
        return Vec::new();
    }
    let mut scores = Vec::with_capacity(seq.len() - 1);
    let mut mismatches = 0u32;
    let mut consecutive_at = 0usize;
    for window in seq.windows(2) {
        let a = window[0].to_ascii_uppercase();
        let b = window[1].to_ascii_uppercase();
        let transition = (a, b);
        let score = match transition {
            (b'G', b'C') | (b'C', b'G') => {
                mismatches = 0;
                consecutive_at = 0;
                params.gc_weight + params.cadence_reward
            }
            (b'G', b'T') | (b'T', b'G') => {
                mismatches = 0;
                consecutive_at = 0;
                params.gt_weight + params.cadence_reward
            }
            (b'A', b'C') | (b'C', b'A') => {
                mismatches = 0;
                consecutive_at = 0;
                params.ac_weight + params.cadence_reward
            }
            (b'A', b'T') | (b'T', b'A') => {
                let bonus = params
                    .consecutive_at_scoring
                    .get(consecutive_at)
                    .copied()
                    .unwrap_or(*params.consecutive_at_scoring.last().unwrap());
                consecutive_at += 1;
                mismatches = 0;
                params.at_weight + bonus + params.cadence_reward
            }
            _ => {
                mismatches += 1;
                consecutive_at = 0;
                let penalty = if params.exponential_penalty {
                    params.mismatch_penalty_starting_value.powi(mismatches as i32)
                } else {
                    params.mismatch_penalty_starting_value
                        + params.mismatch_penalty_linear_delta * (mismatches as f64 - 1.0)
                };
                -penalty.min(MISMATCH_PENALTY_CAP)
            }
        };
        scores.push(score);
    }
    scores
}

/// One emitted Kadane region: base-indexed `[start, end]` inclusive, the
/// accumulated score, and whether it should be classified `eGZ`.
#[derive(Clone, Debug)]
pub struct ZDnaRegion {
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

/// Modified Kadane scan: opens a region once the running sum first crosses
/// `threshold`, closes it when the running sum goes negative or has
/// dropped `drop_threshold` below the region's peak. Grounded on
/// `zdna_calculator.py::subarrays_above_threshold`.
pub fn find_zdna_regions(seq: &[u8], params: &ZDnaParams) -> Vec<ZDnaRegion> {
    let scores = transition_scores(seq, params);
    if scores.is_empty() {
        return Vec::new();
    }

    let mut regions = Vec::new();
    let mut running = 0.0f64;
    let mut region_start = 0usize;
    let mut candidate_start = 0usize;
    let mut candidate_score = 0.0f64;
    let mut peak = 0.0f64;
    let mut in_region = false;

    for (i, &s) in scores.iter().enumerate() {
        if running + s < s {
            running = s;
            region_start = i;
        } else {
            running += s;
        }

        if !in_region && running >= params.threshold {
            in_region = true;
            candidate_start = region_start;
            candidate_score = running;
            peak = running;
        } else if in_region && running > peak {
            peak = running;
            candidate_score = running;
        }

        if in_region && (running < 0.0 || peak - running >= params.drop_threshold) {
            regions.push(ZDnaRegion {
                start: candidate_start,
                end: i,
                score: candidate_score,
            });
            in_region = false;
            running = 0.0;
            region_start = i + 1;
            peak = 0.0;
        }
    }

    if in_region {
        regions.push(ZDnaRegion {
            start: candidate_start,
            end: scores.len(),
            score: candidate_score,
        });
    }

    regions
}

fn count_overlapping(seq: &[u8], unit: &[u8]) -> usize {
    if seq.len() < unit.len() {
        return 0;
    }
    seq.windows(unit.len())
        .filter(|w| w.eq_ignore_ascii_case(unit))
        .count()
}

/// `eGZ` iff the region's CGG-trinucleotide count exceeds its count of
/// "pure" CG dinucleotides, i.e. CG steps not already part of a CGG triplet
/// (§4.3.3). Every CGG start is also a CG start, so comparing CGG directly
/// against total CG would always be false; subtracting the CGG count out
/// of the CG count isolates the alternating-CG content a canonical Z-DNA
/// tract is made of, which a CGG-repeat tract has none of.
pub fn is_egz(region_seq: &[u8]) -> bool {
    let cgg = count_overlapping(region_seq, b"CGG");
    let cg = count_overlapping(region_seq, b"CG");
    cgg > cg.saturating_sub(cgg)
}

pub struct ZDnaDetector;

impl Detector for ZDnaDetector {
    fn class(&self) -> MotifClass {
        MotifClass::ZDna
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        let params = ZDnaParams::default();
        find_zdna_regions(ctx.chunk, &params)
            .into_iter()
            .enumerate()
            .map(|(motif_id, region)| {
                let matched = ctx.slice(region.start, region.end + 1);
                let subclass = if is_egz(matched.as_bytes()) { "eGZ" } else { "Z-DNA" };
                let (start, end) = ctx.to_global(region.start, region.end + 1);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::ZDna,
                    Some(subclass.to_string()),
                    motif_id,
                    start,
                    end,
                    matched,
                    "z_dna_kadane",
                )
                .with_score(region.score, "Z_DNA_Kadane")
            })
            .collect()
    }

    fn score(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        // Scoring happens in `detect` since the Kadane scan produces both
        // the region and its score in one pass; this is a pass-through.
        candidates
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_s2_cg_repeat_is_zdna() {
        let seq = b"CGCGCGCGCGCGCGCGCGCG";
        let params = ZDnaParams::default();
        let regions = find_zdna_regions(seq, &params);
        assert!(!regions.is_empty());
        let best = regions.iter().max_by(|a, b| a.score.partial_cmp(&b.score).unwrap()).unwrap();
        assert!(best.score >= params.threshold);
        let matched = &seq[best.start..=best.end];
        assert!(!is_egz(matched));
    }

    #[test]
    fn test_s3_cgg_repeat_is_egz() {
        let seq = b"CGGCGGCGGCGGCGGCGG";
        let params = ZDnaParams::default();
        let regions = find_zdna_regions(seq, &params);
        assert!(!regions.is_empty());
        let best = regions.iter().max_by(|a, b| a.score.partial_cmp(&b.score).unwrap()).unwrap();
        let matched = &seq[best.start..=best.end];
        assert!(is_egz(matched));
    }

    #[test]
    fn test_no_region_below_threshold() {
        let seq = b"AAAAAAAAAAAAAAAAAAAA";
        let params = ZDnaParams::default();
        let regions = find_zdna_regions(seq, &params);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_detect_via_context() {
        let seq = "CGCGCGCGCGCGCGCGCGCG";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let detector = ZDnaDetector;
        let candidates = detector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].subclass.as_deref(), Some("Z-DNA"));
    }
}
