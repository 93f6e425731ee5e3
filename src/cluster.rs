//! Non-B DNA cluster synthesis (§4.3.11): a post-processing stage over
//! the union of resolved primary candidates, windowing by genomic
//! position rather than by chunk.

use crate::candidate::{Candidate, MotifClass};

/// Default sliding-window width in base pairs.
pub const DEFAULT_WINDOW: u64 = 1_000;

/// Minimum primary candidates a window must contain to seed a cluster.
const MIN_CANDIDATES: usize = 3;
/// Minimum distinct classes a window must contain to seed a cluster.
const MIN_CLASSES: usize = 2;

fn density_per_kb(count: usize, length: u64) -> f64 {
    if length == 0 {
        return 0.0;
    }
    count as f64 / (length as f64 / 1000.0)
}

/// `0.7*density_per_kb + 0.3*min(length/5000, 1)`, per §4.3.11.
fn cluster_score(count: usize, length: u64) -> f64 {
    let density = density_per_kb(count, length);
    let length_term = (length as f64 / 5000.0).min(1.0);
    0.7 * density + 0.3 * length_term
}

/// One windowed candidate group before it is turned into a `Candidate`.
struct Window {
    start: u64,
    end: u64,
    count: usize,
}

/// Slides a window of width `window` (stepped at every distinct primary
/// candidate start, since only those positions can change window
/// membership) across `sorted` (already sorted by `start`), seeding a
/// window wherever it holds `>= MIN_CANDIDATES` candidates from
/// `>= MIN_CLASSES` distinct classes.
fn candidate_windows(sorted: &[&Candidate], window: u64) -> Vec<Window> {
    let mut windows = Vec::new();
    for (i, seed) in sorted.iter().enumerate() {
        let window_start = seed.start;
        let window_end = window_start + window;
        let members: Vec<&&Candidate> = sorted[i..]
            .iter()
            .take_while(|c| c.start < window_end)
            .collect();
        if members.len() < MIN_CANDIDATES {
            continue;
        }
        let mut classes: Vec<&str> = Vec::new();
        for m in &members {
            if !classes.contains(&m.class_name.as_str()) {
                classes.push(&m.class_name);
            }
        }
        if classes.len() < MIN_CLASSES {
            continue;
        }
        let start = members.iter().map(|c| c.start).min().unwrap();
        let end = members.iter().map(|c| c.end).max().unwrap();
        windows.push(Window {
            start,
            end,
            count: members.len(),
        });
    }
    windows
}

/// Merges overlapping windows, retaining the longest at each overlap.
fn merge_windows(mut windows: Vec<Window>) -> Vec<Window> {
    windows.sort_by_key(|w| w.start);
    let mut merged: Vec<Window> = Vec::new();
    for w in windows {
        if let Some(last) = merged.last_mut() {
            if w.start <= last.end {
                if w.end - w.start > last.end - last.start {
                    last.start = w.start;
                    last.end = w.end;
                    last.count = w.count;
                } else if w.end > last.end {
                    last.end = w.end;
                }
                continue;
            }
        }
        merged.push(w);
    }
    merged
}

/// Derives cluster candidates for one sequence's worth of already-resolved
/// primary candidates. `sequence_name`/`contig` are taken from the first
/// candidate; callers are expected to partition `primary` by
/// `sequence_name` before calling.
pub fn synthesize_clusters(primary: &[Candidate], window: u64) -> Vec<Candidate> {
    if primary.is_empty() {
        return Vec::new();
    }
    let mut sorted: Vec<&Candidate> = primary.iter().collect();
    sorted.sort_by_key(|c| c.start);

    let windows = merge_windows(candidate_windows(&sorted, window));
    let sequence_name = &primary[0].sequence_name;
    let contig = &primary[0].contig;

    windows
        .into_iter()
        .enumerate()
        .map(|(motif_id, w)| {
            let length = w.end - w.start + 1;
            let score = cluster_score(w.count, length);
            Candidate::new(
                sequence_name.clone(),
                contig.clone(),
                MotifClass::Cluster,
                Some(format!("cluster_{}_motifs", w.count)),
                motif_id,
                w.start,
                w.end,
                "N".repeat(length as usize),
                "nonb_cluster",
            )
            .with_score(score, "nonb_cluster_density")
        })
        .collect()
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
    fn test_three_classes_in_window_emits_cluster() {
        let candidates = vec![
            make(MotifClass::GQuadruplex, 10, 20),
            make(MotifClass::Triplex, 100, 110),
            make(MotifClass::ZDna, 200, 210),
        ];
        let clusters = synthesize_clusters(&candidates, DEFAULT_WINDOW);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].class_name, "cluster");
        assert_eq!(clusters[0].start, 10);
        assert_eq!(clusters[0].end, 210);
    }

    #[test]
    fn test_single_class_does_not_cluster() {
        let candidates = vec![
            make(MotifClass::GQuadruplex, 10, 20),
            make(MotifClass::GQuadruplex, 100, 110),
            make(MotifClass::GQuadruplex, 200, 210),
        ];
        assert!(synthesize_clusters(&candidates, DEFAULT_WINDOW).is_empty());
    }

    #[test]
    fn test_two_candidates_below_count_floor_does_not_cluster() {
        let candidates = vec![
            make(MotifClass::GQuadruplex, 10, 20),
            make(MotifClass::Triplex, 100, 110),
        ];
        assert!(synthesize_clusters(&candidates, DEFAULT_WINDOW).is_empty());
    }

    #[test]
    fn test_far_apart_groups_do_not_merge() {
        let mut candidates = vec![
            make(MotifClass::GQuadruplex, 10, 20),
            make(MotifClass::Triplex, 100, 110),
            make(MotifClass::ZDna, 200, 210),
        ];
        candidates.extend(vec![
            make(MotifClass::GQuadruplex, 50_000, 50_010),
            make(MotifClass::Triplex, 50_100, 50_110),
            make(MotifClass::ZDna, 50_200, 50_210),
        ]);
        let clusters = synthesize_clusters(&candidates, DEFAULT_WINDOW);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_clusters() {
        assert!(synthesize_clusters(&[], DEFAULT_WINDOW).is_empty());
    }
}
