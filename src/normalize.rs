//! Score Normalization (§4.6), grounded on `motifs/base.py::normalize_scores`.
//! Operates per `class_name` so that G4Hunter's `[-4, +4]` scale and
//! A-philic's unbounded positive scale remain comparable only within
//! their own class.

use fnv::FnvHashMap;

use crate::candidate::Candidate;
use crate::config::NormalizeMode;

fn min_max(scores: &[f64]) -> Vec<f64> {
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        scores.iter().map(|&s| (s - min) / (max - min)).collect()
    } else {
        vec![1.0; scores.len()]
    }
}

fn mean_std(scores: &[f64]) -> (f64, f64) {
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Z-score then rescaled to `[0, 1]` by a second min-max pass, per
/// spec.md's explicit rescale step (DESIGN.md Open Question 4 — absent
/// from `base.py`, implemented here as specified).
fn z_score_rescaled(scores: &[f64]) -> Vec<f64> {
    let (mean, std) = mean_std(scores);
    let z: Vec<f64> = if std > 0.0 {
        scores.iter().map(|&s| (s - mean) / std).collect()
    } else {
        vec![0.0; scores.len()]
    };
    min_max(&z)
}

/// Normalizes `raw_score` into `normalized_score` independently for each
/// `class_name` group, mutating candidates in place (order-preserving).
pub fn normalize_scores(candidates: &mut [Candidate], mode: NormalizeMode) {
    let mut by_class: FnvHashMap<String, Vec<usize>> = FnvHashMap::default();
    for (i, c) in candidates.iter().enumerate() {
        by_class.entry(c.class_name.clone()).or_default().push(i);
    }

    for indices in by_class.values() {
        let raw: Vec<f64> = indices
            .iter()
            .map(|&i| candidates[i].raw_score.unwrap_or(0.0))
            .collect();
        let normalized = match mode {
            NormalizeMode::MinMax => min_max(&raw),
            NormalizeMode::ZScore => z_score_rescaled(&raw),
        };
        for (slot, &i) in indices.iter().enumerate() {
            candidates[i].normalized_score = Some(normalized[slot]);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::candidate::MotifClass;

    fn make(score: f64) -> Candidate {
        Candidate::new(
            "seq1",
            "seq1",
            MotifClass::GQuadruplex,
            None,
            0,
            1,
            10,
            "G".repeat(10),
            "p",
        )
        .with_score(score, "m")
    }

    #[test]
    fn test_p4_minmax_spans_zero_to_one() {
        let mut candidates = vec![make(0.2), make(0.5), make(0.9)];
        normalize_scores(&mut candidates, NormalizeMode::MinMax);
        let scores: Vec<f64> = candidates.iter().map(|c| c.normalized_score.unwrap()).collect();
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_singleton_class_normalizes_to_one() {
        let mut candidates = vec![make(0.4)];
        normalize_scores(&mut candidates, NormalizeMode::MinMax);
        assert_eq!(candidates[0].normalized_score, Some(1.0));
    }

    #[test]
    fn test_zscore_rescaled_is_bounded() {
        let mut candidates = vec![make(0.1), make(0.3), make(0.8), make(1.2)];
        normalize_scores(&mut candidates, NormalizeMode::ZScore);
        for c in &candidates {
            let s = c.normalized_score.unwrap();
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
