//! Visualization Accumulator (§4.7), grounded on
//! `Utilities/visualization_accumulator.py`'s `update`/`get_summary`/
//! `reset` trio. A streaming aggregator fed one chunk-worth of candidates
//! at a time; all arrays are fixed-size at construction so memory is
//! `O(C^2 + B)` regardless of sequence length.

use fnv::FnvHashMap;

use crate::candidate::{Candidate, MotifClass};

/// Fixed-size streaming summary, constructed once per sequence (or per
/// run, for multi-sequence FASTA inputs treated as one summary).
pub struct VisualizationAccumulator {
    total_length: u64,
    bin_count: usize,
    max_length: u64,
    class_counts: FnvHashMap<String, u64>,
    subclass_counts: FnvHashMap<String, u64>,
    density_bins: Vec<u64>,
    length_bins: Vec<u64>,
    class_index: FnvHashMap<String, usize>,
    cooccurrence: Vec<Vec<u64>>,
}

impl VisualizationAccumulator {
    pub fn new(total_length: u64, bin_count: usize, max_length: u64) -> Self {
        let classes = MotifClass::ALL;
        let mut class_index = FnvHashMap::default();
        for (i, c) in classes.iter().enumerate() {
            class_index.insert(c.name().to_string(), i);
        }
        let n = classes.len();
        VisualizationAccumulator {
            total_length: total_length.max(1),
            bin_count: bin_count.max(1),
            max_length: max_length.max(1),
            class_counts: FnvHashMap::default(),
            subclass_counts: FnvHashMap::default(),
            density_bins: vec![0; bin_count.max(1)],
            length_bins: vec![0; bin_count.max(1)],
            class_index,
            cooccurrence: vec![vec![0; n]; n],
        }
    }

    fn density_bin(&self, start: u64) -> usize {
        let frac = (start.saturating_sub(1)) as f64 / self.total_length as f64;
        ((frac * self.bin_count as f64) as usize).min(self.bin_count - 1)
    }

    fn length_bin(&self, length: u64) -> usize {
        let clamped = length.min(self.max_length);
        let frac = clamped as f64 / self.max_length as f64;
        ((frac * self.bin_count as f64) as usize).min(self.bin_count - 1)
    }

    /// Feeds one chunk-worth of candidates. The co-occurrence step
    /// iterates *ordered* pairs `(ca, cb)` over the distinct classes
    /// present in the batch, including `ca == cb` (a diagonal
    /// count-in-batch entry), preserving the source's exact semantics
    /// rather than "cleaning up" to unordered pairs (§4.7 grounding note).
    pub fn update(&mut self, batch: &[Candidate]) {
        let mut distinct_classes: Vec<&str> = Vec::new();
        for c in batch {
            *self.class_counts.entry(c.class_name.clone()).or_insert(0) += 1;
            if let Some(sub) = &c.subclass {
                *self.subclass_counts.entry(sub.clone()).or_insert(0) += 1;
            }
            let db = self.density_bin(c.start);
            self.density_bins[db] += 1;
            let lb = self.length_bin(c.length);
            self.length_bins[lb] += 1;
            if !distinct_classes.contains(&c.class_name.as_str()) {
                distinct_classes.push(&c.class_name);
            }
        }

        for &ca in &distinct_classes {
            for &cb in &distinct_classes {
                if let (Some(&ia), Some(&ib)) =
                    (self.class_index.get(ca), self.class_index.get(cb))
                {
                    self.cooccurrence[ia][ib] += 1;
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.class_counts.clear();
        self.subclass_counts.clear();
        self.density_bins.iter_mut().for_each(|b| *b = 0);
        self.length_bins.iter_mut().for_each(|b| *b = 0);
        for row in self.cooccurrence.iter_mut() {
            row.iter_mut().for_each(|v| *v = 0);
        }
    }

    pub fn get_summary(&self) -> VisualizationSummary {
        VisualizationSummary {
            class_counts: self.class_counts.clone(),
            subclass_counts: self.subclass_counts.clone(),
            density_bins: self.density_bins.clone(),
            length_bins: self.length_bins.clone(),
            cooccurrence: self.cooccurrence.clone(),
            class_index: self.class_index.clone(),
        }
    }
}

/// Language-neutral summary record (§3), exposed as-is for downstream
/// renderers.
#[derive(Clone, Debug)]
pub struct VisualizationSummary {
    pub class_counts: FnvHashMap<String, u64>,
    pub subclass_counts: FnvHashMap<String, u64>,
    pub density_bins: Vec<u64>,
    pub length_bins: Vec<u64>,
    pub cooccurrence: Vec<Vec<u64>>,
    pub class_index: FnvHashMap<String, usize>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::candidate::MotifClass;

    fn make(class: MotifClass, start: u64, length: u64) -> Candidate {
        Candidate::new(
            "seq1",
            "seq1",
            class,
            None,
            0,
            start,
            start + length - 1,
            "G".repeat(length as usize),
            "p",
        )
    }

    #[test]
    fn test_class_counts_accumulate() {
        let mut acc = VisualizationAccumulator::new(1000, 100, 200);
        acc.update(&[make(MotifClass::GQuadruplex, 10, 20)]);
        acc.update(&[make(MotifClass::GQuadruplex, 500, 20)]);
        let summary = acc.get_summary();
        assert_eq!(summary.class_counts["g_quadruplex"], 2);
    }

    #[test]
    fn test_cooccurrence_diagonal_counts_self_pair() {
        let mut acc = VisualizationAccumulator::new(1000, 100, 200);
        acc.update(&[make(MotifClass::GQuadruplex, 10, 20)]);
        let summary = acc.get_summary();
        let i = summary.class_index["g_quadruplex"];
        assert_eq!(summary.cooccurrence[i][i], 1);
    }

    #[test]
    fn test_cooccurrence_cross_class_pair() {
        let mut acc = VisualizationAccumulator::new(1000, 100, 200);
        acc.update(&[make(MotifClass::GQuadruplex, 10, 20), make(MotifClass::Triplex, 10, 20)]);
        let summary = acc.get_summary();
        let ig = summary.class_index["g_quadruplex"];
        let it = summary.class_index["triplex"];
        assert_eq!(summary.cooccurrence[ig][it], 1);
        assert_eq!(summary.cooccurrence[it][ig], 1);
    }

    #[test]
    fn test_reset_clears_all_state() {
        let mut acc = VisualizationAccumulator::new(1000, 100, 200);
        acc.update(&[make(MotifClass::GQuadruplex, 10, 20)]);
        acc.reset();
        let summary = acc.get_summary();
        assert!(summary.class_counts.is_empty());
        assert!(summary.density_bins.iter().all(|&b| b == 0));
        assert!(summary.cooccurrence.iter().all(|row| row.iter().all(|&v| v == 0)));
    }

    #[test]
    fn test_fixed_size_regardless_of_batch_count() {
        let mut acc = VisualizationAccumulator::new(1_000_000, 100, 10_000);
        for i in 0..50 {
            acc.update(&[make(MotifClass::GQuadruplex, i * 1000 + 1, 20)]);
        }
        let summary = acc.get_summary();
        assert_eq!(summary.density_bins.len(), 100);
        assert_eq!(summary.length_bins.len(), 100);
    }
}
