//! A-philic DNA detector (§4.3.4): tetra/tri-nucleotide propensity step
//! scoring, nucleation-seeded best-subarray extension, and greedy
//! non-overlapping region selection. Grounded on the source's
//! `call_Aphilic.py` algorithm, with the propensity tables embedded in
//! `src/detectors/aphilic_tables.rs`.

use crate::candidate::{Candidate, MotifClass};
use crate::detectors::aphilic_tables::{tetra_score, tri_population_stats, tri_score};
use crate::detectors::{DetectContext, Detector};

pub struct APhilicDetector;

/// `step[i] = 0.7*tetra_score(s[i..i+4]) + 0.3*tri_score(s[i..i+3])` for
/// `i` in `[0, L-4)`.
fn step_scores(seq: &[u8]) -> Vec<f64> {
    let n = seq.len();
    if n < 4 {
        return Vec::new();
    }
    (0..n - 4)
        .map(|i| {
            let tetra = std::str::from_utf8(&seq[i..i + 4]).unwrap_or("");
            let tri = std::str::from_utf8(&seq[i..i + 3]).unwrap_or("");
            0.7 * tetra_score(tetra) + 0.3 * tri_score(tri)
        })
        .collect()
}

fn tri_score_at(seq: &[u8], k: usize) -> f64 {
    let tri = std::str::from_utf8(&seq[k..k + 3]).unwrap_or("");
    tri_score(tri)
}

/// A position `j` seeds a nucleation iff every one of the seven overlapping
/// tetra propensities in `step[j..j+7)` is positive, and some length-3
/// window of trinucleotide scores inside `[j, j+8)` sums to at least the
/// auto threshold `mean*3 + std*sqrt(3)`.
fn is_nucleation_seed(seq: &[u8], step: &[f64], j: usize) -> bool {
    if j + 7 > step.len() {
        return false;
    }
    if !step[j..j + 7].iter().all(|&s| s > 0.0) {
        return false;
    }
    let (mean, std) = tri_population_stats();
    let threshold = mean * 3.0 + std * 3.0f64.sqrt();
    let window_end = (j + 8).min(seq.len().saturating_sub(2));
    let mut k = j;
    while k + 2 < window_end && k + 3 <= seq.len() {
        if k + 2 + 3 <= seq.len() {
            let sum = tri_score_at(seq, k) + tri_score_at(seq, k + 1) + tri_score_at(seq, k + 2);
            if sum >= threshold {
                return true;
            }
        }
        k += 1;
    }
    false
}

/// One accepted A-philic region in step-index space (half-open `[l, r)`
/// over `step`), its nucleotide span, and its un-normalized raw score.
struct APhilicRegion {
    nt_start: usize,
    nt_end: usize,
    raw_score: f64,
}

/// Extends the seed interval `[a, b]` (inclusive, step-index space) to the
/// best-subarray-containing-interval via prefix-sum min/max sweeps, then
/// applies the length/mean acceptance filter.
fn extend_seed(step: &[f64], a: usize, b: usize) -> Option<APhilicRegion> {
    let n = step.len();
    let mut prefix = vec![0.0f64; n + 1];
    for i in 0..n {
        prefix[i + 1] = prefix[i] + step[i];
    }

    let mut l_best = 0usize;
    let mut min_prefix = prefix[0];
    for i in 1..=a {
        if prefix[i] < min_prefix {
            min_prefix = prefix[i];
            l_best = i;
        }
    }

    let mut r_best = b + 1;
    let mut max_prefix = prefix[b + 1];
    for r in (b + 2)..=n {
        if prefix[r] > max_prefix {
            max_prefix = prefix[r];
            r_best = r;
        }
    }

    let raw_score = prefix[r_best] - prefix[l_best];
    let nt_start = l_best;
    let nt_end = r_best + 3;
    let length_nt = nt_end - nt_start;
    let step_count = r_best - l_best;
    if step_count == 0 {
        return None;
    }
    let mean = raw_score / step_count as f64;
    if length_nt >= 10 && mean > 0.0 {
        Some(APhilicRegion {
            nt_start,
            nt_end,
            raw_score,
        })
    } else {
        None
    }
}

fn find_aphilic_regions(seq: &[u8]) -> Vec<APhilicRegion> {
    if seq.len() < 10 {
        return Vec::new();
    }
    let step = step_scores(seq);
    if step.len() < 7 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for j in 0..step.len() {
        if !is_nucleation_seed(seq, &step, j) {
            continue;
        }
        let a = j;
        let b = (j + 6).min(step.len() - 1);
        if let Some(region) = extend_seed(&step, a, b) {
            candidates.push(region);
        }
    }

    candidates.sort_by(|x, y| y.raw_score.partial_cmp(&x.raw_score).unwrap());
    let mut selected: Vec<APhilicRegion> = Vec::new();
    for cand in candidates {
        let overlaps = selected
            .iter()
            .any(|s| cand.nt_start < s.nt_end && s.nt_start < cand.nt_end);
        if !overlaps {
            selected.push(cand);
        }
    }
    selected.sort_by_key(|r| r.nt_start);
    selected
}

impl Detector for APhilicDetector {
    fn class(&self) -> MotifClass {
        MotifClass::APhilic
    }

    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate> {
        find_aphilic_regions(ctx.chunk)
            .into_iter()
            .enumerate()
            .map(|(motif_id, region)| {
                let matched = ctx.slice(region.nt_start, region.nt_end);
                let (start, end) = ctx.to_global(region.nt_start, region.nt_end);
                Candidate::new(
                    ctx.sequence_name,
                    ctx.contig,
                    MotifClass::APhilic,
                    Some("A_philic_tract".to_string()),
                    motif_id,
                    start,
                    end,
                    matched,
                    "A_philic_enhanced_nucleation_extension",
                )
                .with_score(region.raw_score, "A_philic_enhanced_nucleation_extension")
            })
            .collect()
    }

    fn score(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        // Scoring already computed in `detect` alongside region extension.
        candidates
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_short_sequence_returns_empty() {
        let seq = b"ACGTACGT";
        assert!(find_aphilic_regions(seq).is_empty());
    }

    #[test]
    fn test_c_rich_sequence_may_nucleate() {
        let seq = b"CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC";
        let step = step_scores(seq);
        assert!(step.iter().all(|&s| s > 0.0));
        let regions = find_aphilic_regions(seq);
        assert!(!regions.is_empty());
        for region in &regions {
            assert!(region.nt_end - region.nt_start >= 10);
            assert!(region.raw_score > 0.0);
        }
    }

    #[test]
    fn test_detect_and_score_nonempty() {
        let seq = "CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC";
        let ctx = DetectContext::new(seq.as_bytes(), seq, "seq1", "seq1", 0);
        let candidates = APhilicDetector.detect_and_score(&ctx);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.raw_score.unwrap() > 0.0));
    }

    #[test]
    fn test_selected_regions_non_overlapping() {
        let seq = b"CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC";
        let regions = find_aphilic_regions(seq);
        for w in regions.windows(2) {
            assert!(w[0].nt_end <= w[1].nt_start);
        }
    }
}
