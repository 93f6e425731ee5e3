//! Overlap Resolution L4 (§4.5), grounded on
//! `NONHYPERSCAN/overlap_resolution.py` and this workspace's `region.rs`
//! sort-and-sweep `overlaps()` style (generalized from half-open to the
//! spec's closed-interval semantics, already implemented as
//! `Candidate::overlaps`/`overlap_fraction`).

use fnv::FnvHashMap;

use std::str::FromStr;

use crate::candidate::{Candidate, MotifClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapStrategy {
    HighestScore,
    LongestMotif,
    ScientificPriority,
    MergeCompatible,
    KeepAll,
}

#[derive(Clone, Debug)]
pub struct OverlapOptions {
    pub strategy: OverlapStrategy,
    pub min_overlap_percent: f64,
    pub same_class_only: bool,
    pub merge_threshold: f64,
}

impl Default for OverlapOptions {
    fn default() -> Self {
        OverlapOptions {
            strategy: OverlapStrategy::HighestScore,
            min_overlap_percent: 0.10,
            same_class_only: true,
            merge_threshold: 0.80,
        }
    }
}

/// Groups candidates by `(sequence_name, class_name)` when
/// `same_class_only`, else by `sequence_name` alone, matching the
/// source's `_group_candidates`.
fn group_key(c: &Candidate, same_class_only: bool) -> (String, String) {
    if same_class_only {
        (c.sequence_name.clone(), c.class_name.clone())
    } else {
        (c.sequence_name.clone(), String::new())
    }
}

fn group_candidates(
    candidates: Vec<Candidate>,
    same_class_only: bool,
) -> Vec<Vec<Candidate>> {
    let mut groups: FnvHashMap<(String, String), Vec<Candidate>> = FnvHashMap::default();
    for c in candidates {
        let key = group_key(&c, same_class_only);
        groups.entry(key).or_default().push(c);
    }
    groups.into_values().collect()
}

fn is_overlapping(a: &Candidate, b: &Candidate, min_overlap_percent: f64) -> bool {
    a.overlaps(b) && a.overlap_fraction(b) >= min_overlap_percent
}

/// Finds connected components of mutually-overlapping candidates within a
/// single group, via a sort-by-`start` sweep (the `region.rs`-style
/// sort-and-sweep substitute for a true interval tree, per §4.5's
/// implementation mapping note).
fn conflict_components(group: &[Candidate], min_overlap_percent: f64) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..group.len()).collect();
    order.sort_by_key(|&i| group[i].start);

    let mut visited = vec![false; group.len()];
    let mut components = Vec::new();
    for &seed in &order {
        if visited[seed] {
            continue;
        }
        let mut stack = vec![seed];
        let mut component = Vec::new();
        visited[seed] = true;
        while let Some(i) = stack.pop() {
            component.push(i);
            for &j in &order {
                if !visited[j] && is_overlapping(&group[i], &group[j], min_overlap_percent) {
                    visited[j] = true;
                    stack.push(j);
                }
            }
        }
        components.push(component);
    }
    components
}

fn resolve_highest_score(group: &mut [Candidate], component: &[usize], same_class_only: bool) -> Vec<Candidate> {
    let mut sorted: Vec<usize> = component.to_vec();
    sorted.sort_by(|&a, &b| {
        let ca = &group[a];
        let cb = &group[b];
        cb.raw_score
            .partial_cmp(&ca.raw_score)
            .unwrap()
            .then(cb.length.cmp(&ca.length))
            .then(ca.start.cmp(&cb.start))
    });
    let head_idx = sorted[0];
    let mut head = group[head_idx].clone();
    if !same_class_only {
        for &i in &sorted[1..] {
            let name = group[i].class_name.clone();
            if !head.overlap_classes.contains(&name) {
                head.overlap_classes.push(name);
            }
        }
    }
    vec![head]
}

fn class_priority(name: &str) -> u8 {
    MotifClass::from_str(name)
        .map(|c| c.scientific_priority())
        .unwrap_or(u8::MAX)
}

fn resolve_scientific_priority(group: &mut [Candidate], component: &[usize]) -> Vec<Candidate> {
    let mut sorted: Vec<usize> = component.to_vec();
    sorted.sort_by(|&a, &b| {
        let ca = &group[a];
        let cb = &group[b];
        class_priority(&ca.class_name)
            .cmp(&class_priority(&cb.class_name))
            .then(cb.raw_score.partial_cmp(&ca.raw_score).unwrap())
    });
    vec![group[sorted[0]].clone()]
}

fn resolve_merge_compatible(
    group: &mut [Candidate],
    component: &[usize],
    merge_threshold: f64,
) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = component.iter().map(|&i| group[i].clone()).collect();
    let mut changed = true;
    while changed {
        changed = false;
        'outer: for i in 0..merged.len() {
            for j in (i + 1)..merged.len() {
                if merged[i].overlaps(&merged[j])
                    && merged[i].overlap_fraction(&merged[j]) >= merge_threshold
                {
                    let a = merged[i].clone();
                    let b = merged.remove(j);
                    let start = a.start.min(b.start);
                    let end = a.end.max(b.end);
                    let raw_score = match (a.raw_score, b.raw_score) {
                        (Some(x), Some(y)) => Some(x.max(y)),
                        (Some(x), None) => Some(x),
                        (None, Some(y)) => Some(y),
                        (None, None) => None,
                    };
                    let mut overlap_classes = vec![a.class_name.clone(), b.class_name.clone()];
                    overlap_classes.sort();
                    overlap_classes.dedup();
                    let mut replacement = a.clone();
                    replacement.start = start;
                    replacement.end = end;
                    replacement.length = end - start + 1;
                    replacement.subclass = Some(format!(
                        "merged_{}_{}",
                        a.subclass.as_deref().unwrap_or("na"),
                        b.subclass.as_deref().unwrap_or("na")
                    ));
                    replacement.raw_score = raw_score;
                    replacement.overlap_classes = overlap_classes;
                    merged[i] = replacement;
                    changed = true;
                    break 'outer;
                }
            }
        }
    }
    merged
}

/// Annotates every kept record with the `class_name`s of other records it
/// overlaps, per §4.5's "cross-class overlaps are annotated (via
/// `overlap_classes`) but kept" — independent of `same_class_only`, which
/// only governs whether cross-class conflicts are grouped for resolution,
/// never whether they get recorded. Same-sequence pairwise sweep per §9's
/// "sort-and-sweep gives equivalent results" note; `O(n^2)` but the
/// candidate count per sequence after resolution is small.
fn annotate_cross_class_overlaps(candidates: &mut [Candidate], min_overlap_percent: f64) {
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            if candidates[i].sequence_name != candidates[j].sequence_name
                || candidates[i].class_name == candidates[j].class_name
            {
                continue;
            }
            if !is_overlapping(&candidates[i], &candidates[j], min_overlap_percent) {
                continue;
            }
            let name_j = candidates[j].class_name.clone();
            if !candidates[i].overlap_classes.contains(&name_j) {
                candidates[i].overlap_classes.push(name_j);
            }
            let name_i = candidates[i].class_name.clone();
            if !candidates[j].overlap_classes.contains(&name_i) {
                candidates[j].overlap_classes.push(name_i);
            }
        }
    }
    for c in candidates.iter_mut() {
        c.overlap_classes.sort();
    }
}

/// Resolves overlaps across one merged candidate stream per §4.5.
pub fn resolve_overlaps(candidates: Vec<Candidate>, options: &OverlapOptions) -> Vec<Candidate> {
    if let OverlapStrategy::KeepAll = options.strategy {
        let mut output = candidates;
        annotate_cross_class_overlaps(&mut output, options.min_overlap_percent);
        return output;
    }

    let groups = group_candidates(candidates, options.same_class_only);
    let mut output = Vec::new();
    for mut group in groups {
        let components = conflict_components(&group, options.min_overlap_percent);
        for component in components {
            if component.len() == 1 {
                output.push(group[component[0]].clone());
                continue;
            }
            let resolved = match options.strategy {
                OverlapStrategy::HighestScore => {
                    resolve_highest_score(&mut group, &component, options.same_class_only)
                }
                OverlapStrategy::LongestMotif => {
                    let mut sorted = component.clone();
                    sorted.sort_by(|&a, &b| group[b].length.cmp(&group[a].length));
                    vec![group[sorted[0]].clone()]
                }
                OverlapStrategy::ScientificPriority => {
                    resolve_scientific_priority(&mut group, &component)
                }
                OverlapStrategy::MergeCompatible => {
                    resolve_merge_compatible(&mut group, &component, options.merge_threshold)
                }
                OverlapStrategy::KeepAll => component.iter().map(|&i| group[i].clone()).collect(),
            };
            output.extend(resolved);
        }
    }
    annotate_cross_class_overlaps(&mut output, options.min_overlap_percent);
    output
}
