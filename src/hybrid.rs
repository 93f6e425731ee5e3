//! Hybrid synthesis (§4.3.10): a post-processing stage, not a chunk-level
//! detector (§9's resolution of the source's dual hybrid-detector
//! behavior, DESIGN.md Open Question 10). Operates on the union of
//! already-resolved primary candidates rather than on a chunk.

use crate::candidate::{Candidate, MotifClass};

/// For every primary candidate with at least one overlapping candidate
/// from a *different* class, emits a `hybrid` record spanning the same
/// interval, with `overlap_classes` populated by every other class
/// overlapping it. Score = `|overlap_classes| / 10`.
///
/// `primary` is assumed already resolved (post §4.5); this function does
/// not mutate it and does not itself resolve hybrid-vs-hybrid overlaps —
/// that is the caller's job if hybrid candidates are folded back into a
/// resolution pass.
pub fn synthesize_hybrids(primary: &[Candidate]) -> Vec<Candidate> {
    let mut hybrids = Vec::new();
    for (i, c) in primary.iter().enumerate() {
        let mut other_classes: Vec<String> = Vec::new();
        for (j, other) in primary.iter().enumerate() {
            if i == j || other.class_name == c.class_name {
                continue;
            }
            if c.overlaps(other) && !other_classes.contains(&other.class_name) {
                other_classes.push(other.class_name.clone());
            }
        }
        if other_classes.is_empty() {
            continue;
        }
        other_classes.sort();
        let mut hybrid = Candidate::new(
            c.sequence_name.clone(),
            c.contig.clone(),
            MotifClass::Hybrid,
            Some(format!("hybrid_{}", c.class_name)),
            i,
            c.start,
            c.end,
            c.matched_seq.clone(),
            "hybrid_synthesis",
        )
        .with_score(other_classes.len() as f64 / 10.0, "hybrid_overlap_count");
        hybrid.overlap_classes = other_classes;
        hybrids.push(hybrid);
    }
    hybrids
}

#[cfg(test)]
mod test {
    use super::*;

    fn make(class: MotifClass, start: u64, end: u64) -> Candidate {
        let len = (end - start + 1) as usize;
        Candidate::new("seq1", "seq1", class, None, 0, start, end, "G".repeat(len), "p")
            .with_score(1.0, "m")
    }

    #[test]
    fn test_s6_cross_class_overlap_emits_hybrid_for_both() {
        let a = make(MotifClass::GQuadruplex, 1, 20);
        let b = make(MotifClass::Triplex, 10, 29);
        let hybrids = synthesize_hybrids(&[a, b]);
        assert_eq!(hybrids.len(), 2);
        assert!(hybrids.iter().all(|h| h.class_name == "hybrid"));
        assert!(hybrids[0].overlap_classes.contains(&"triplex".to_string()));
        assert!(hybrids[1].overlap_classes.contains(&"g_quadruplex".to_string()));
    }

    #[test]
    fn test_same_class_overlap_is_not_hybrid() {
        let a = make(MotifClass::GQuadruplex, 1, 20);
        let b = make(MotifClass::GQuadruplex, 10, 29);
        let hybrids = synthesize_hybrids(&[a, b]);
        assert!(hybrids.is_empty());
    }

    #[test]
    fn test_non_overlapping_candidates_yield_no_hybrid() {
        let a = make(MotifClass::GQuadruplex, 1, 10);
        let b = make(MotifClass::Triplex, 1000, 1010);
        assert!(synthesize_hybrids(&[a, b]).is_empty());
    }

    #[test]
    fn test_hybrid_score_counts_distinct_overlapping_classes() {
        let a = make(MotifClass::GQuadruplex, 1, 50);
        let b = make(MotifClass::Triplex, 10, 20);
        let c = make(MotifClass::ZDna, 15, 25);
        let hybrids = synthesize_hybrids(&[a, b, c]);
        let a_hybrid = hybrids.iter().find(|h| h.start == 1).unwrap();
        assert_eq!(a_hybrid.raw_score, Some(0.2));
    }
}
