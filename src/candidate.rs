//! The universal `Candidate` record (§3) produced by detectors and consumed
//! by every downstream stage: chunk dedup, overlap resolution, score
//! normalization, the visualization accumulator, and the output writers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eleven motif classes, numbered per the registry this
/// pipeline was distilled from (`curved_dna=1 .. cluster=11`), preserved
/// here for output compatibility with downstream tooling that expects
/// these exact IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MotifClass {
    CurvedDna,
    SlippedDna,
    Cruciform,
    RLoop,
    Triplex,
    GQuadruplex,
    IMotif,
    ZDna,
    APhilic,
    Hybrid,
    Cluster,
}

impl MotifClass {
    pub const PRIMARY: [MotifClass; 9] = [
        MotifClass::CurvedDna,
        MotifClass::SlippedDna,
        MotifClass::Cruciform,
        MotifClass::RLoop,
        MotifClass::Triplex,
        MotifClass::GQuadruplex,
        MotifClass::IMotif,
        MotifClass::ZDna,
        MotifClass::APhilic,
    ];

    pub const ALL: [MotifClass; 11] = [
        MotifClass::CurvedDna,
        MotifClass::SlippedDna,
        MotifClass::Cruciform,
        MotifClass::RLoop,
        MotifClass::Triplex,
        MotifClass::GQuadruplex,
        MotifClass::IMotif,
        MotifClass::ZDna,
        MotifClass::APhilic,
        MotifClass::Hybrid,
        MotifClass::Cluster,
    ];

    /// 1-based numeric ID matching the source registry's `MOTIF_CLASS_IDS`.
    pub fn class_id(&self) -> u8 {
        match self {
            MotifClass::CurvedDna => 1,
            MotifClass::SlippedDna => 2,
            MotifClass::Cruciform => 3,
            MotifClass::RLoop => 4,
            MotifClass::Triplex => 5,
            MotifClass::GQuadruplex => 6,
            MotifClass::IMotif => 7,
            MotifClass::ZDna => 8,
            MotifClass::APhilic => 9,
            MotifClass::Hybrid => 10,
            MotifClass::Cluster => 11,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MotifClass::CurvedDna => "curved_dna",
            MotifClass::SlippedDna => "slipped_dna",
            MotifClass::Cruciform => "cruciform",
            MotifClass::RLoop => "r_loop",
            MotifClass::Triplex => "triplex",
            MotifClass::GQuadruplex => "g_quadruplex",
            MotifClass::IMotif => "i_motif",
            MotifClass::ZDna => "z_dna",
            MotifClass::APhilic => "a_philic",
            MotifClass::Hybrid => "hybrid",
            MotifClass::Cluster => "cluster",
        }
    }

    /// Fixed precedence for `SCIENTIFIC_PRIORITY` overlap resolution (§4.5):
    /// lower number wins. Matches `NONHYPERSCAN/overlap_resolution.py`'s
    /// `priority_order` table.
    pub fn scientific_priority(&self) -> u8 {
        match self {
            MotifClass::GQuadruplex => 1,
            MotifClass::IMotif => 2,
            MotifClass::ZDna => 3,
            MotifClass::Triplex => 4,
            MotifClass::Cruciform => 5,
            MotifClass::RLoop => 6,
            MotifClass::CurvedDna => 7,
            MotifClass::SlippedDna => 8,
            MotifClass::Hybrid => 9,
            MotifClass::Cluster => 10,
        }
    }
}

impl fmt::Display for MotifClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MotifClass {
    type Err = crate::error::NonBError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MotifClass::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| crate::error::NonBError::UnknownClass(s.to_string()))
    }
}

/// Genome-global, 1-based inclusive `Candidate` record.
///
/// Invariants (§3 I1-I3, enforced by [`Candidate::new`]):
///   - `start <= end`
///   - `length == end - start + 1 == matched_seq.len()`
///   - `matched_seq` is the literal subsequence at `[start-1, end)` of the
///     origin sequence (the constructor trusts its caller for this one,
///     since it has no access to the full sequence after chunking; callers
///     are the detectors, which slice directly from the chunk buffer).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub sequence_name: String,
    pub contig: String,
    pub class_id: u8,
    pub class_name: String,
    pub subclass: Option<String>,
    pub motif_id: usize,
    pub start: u64,
    pub end: u64,
    pub length: u64,
    pub matched_seq: String,
    pub pattern_name: String,
    pub raw_score: Option<f64>,
    pub normalized_score: Option<f64>,
    pub scoring_method: Option<String>,
    pub gc_content: Option<f64>,
    #[serde(default)]
    pub overlap_classes: Vec<String>,
}

impl Candidate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence_name: impl Into<String>,
        contig: impl Into<String>,
        class: MotifClass,
        subclass: impl Into<Option<String>>,
        motif_id: usize,
        start: u64,
        end: u64,
        matched_seq: impl Into<String>,
        pattern_name: impl Into<String>,
    ) -> Self {
        let matched_seq = matched_seq.into();
        let length = end - start + 1;
        debug_assert_eq!(
            length as usize,
            matched_seq.len(),
            "candidate length must match matched_seq length"
        );
        let gc_content = Some(gc_content(matched_seq.as_bytes()));
        Candidate {
            sequence_name: sequence_name.into(),
            contig: contig.into(),
            class_id: class.class_id(),
            class_name: class.name().to_string(),
            subclass: subclass.into(),
            motif_id,
            start,
            end,
            length,
            matched_seq,
            pattern_name: pattern_name.into(),
            raw_score: None,
            normalized_score: None,
            scoring_method: None,
            gc_content,
            overlap_classes: Vec::new(),
        }
    }

    pub fn with_score(mut self, raw_score: f64, scoring_method: impl Into<String>) -> Self {
        self.raw_score = Some(raw_score);
        self.scoring_method = Some(scoring_method.into());
        self
    }

    /// Half-open `[start, end)` view in 0-based coordinates, the form used
    /// internally by the overlap resolver and chunk dedup logic.
    pub fn span_0based(&self) -> (u64, u64) {
        (self.start - 1, self.end)
    }

    pub fn overlaps(&self, other: &Candidate) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Overlap length as a fraction of the shorter candidate's length,
    /// matching `NONHYPERSCAN/overlap_resolution.py::_calculate_overlap_percent`.
    pub fn overlap_fraction(&self, other: &Candidate) -> f64 {
        let overlap_start = self.start.max(other.start);
        let overlap_end = self.end.min(other.end);
        if overlap_start > overlap_end {
            return 0.0;
        }
        let overlap_len = (overlap_end - overlap_start + 1) as f64;
        let min_len = self.length.min(other.length) as f64;
        if min_len == 0.0 {
            0.0
        } else {
            overlap_len / min_len
        }
    }
}

/// Fraction of `G`/`C` (case-insensitive) bases in `seq`.
pub fn gc_content(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc = seq
        .iter()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();
    gc as f64 / seq.len() as f64
}
