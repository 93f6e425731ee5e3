//! L2 Class Detectors: one module per motif class, each implementing
//! [`Detector`]. `detect` assigns positions, subclass and `matched_seq`;
//! `score` fills `raw_score`/`scoring_method` from `matched_seq` alone, so
//! the two operations stay independently invocable per chunk as required.

pub mod aphilic;
pub mod aphilic_tables;
pub mod cruciform;
pub mod curved;
pub mod g4;
pub mod imotif;
pub mod rloop;
pub mod slipped;
pub mod triplex;
pub mod zdna;

use crate::candidate::{Candidate, MotifClass};

/// Everything a detector needs about the chunk it is scanning: the bytes
/// (upper-cased, `{A,C,G,T,N}`), the same bytes as `&str` for regex-backed
/// detectors, and the coordinate frame to translate chunk-local offsets
/// into genome-global 1-based positions.
pub struct DetectContext<'a> {
    pub chunk: &'a [u8],
    pub chunk_str: &'a str,
    pub sequence_name: &'a str,
    pub contig: &'a str,
    /// 0-based global offset of `chunk[0]`.
    pub global_offset: u64,
}

impl<'a> DetectContext<'a> {
    pub fn new(
        chunk: &'a [u8],
        chunk_str: &'a str,
        sequence_name: &'a str,
        contig: &'a str,
        global_offset: u64,
    ) -> Self {
        DetectContext {
            chunk,
            chunk_str,
            sequence_name,
            contig,
            global_offset,
        }
    }

    /// Converts a chunk-local 0-based half-open span to genome-global
    /// 1-based inclusive coordinates.
    pub fn to_global(&self, local_start: usize, local_end: usize) -> (u64, u64) {
        let start = self.global_offset + local_start as u64 + 1;
        let end = self.global_offset + local_end as u64;
        (start, end)
    }

    pub fn slice(&self, local_start: usize, local_end: usize) -> &'a str {
        &self.chunk_str[local_start..local_end]
    }
}

/// Shared capability set every primary (non-derived) class implements.
/// Hybrid and cluster are post-processing stages over the union of
/// primary candidates (§9 Open Question), not `Detector` variants.
pub trait Detector {
    fn class(&self) -> MotifClass;
    fn detect(&self, ctx: &DetectContext) -> Vec<Candidate>;
    fn score(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;

    fn detect_and_score(&self, ctx: &DetectContext) -> Vec<Candidate> {
        let candidates = self.detect(ctx);
        self.score(candidates)
    }
}

/// Sum type over the nine primary detectors, dispatched by exhaustive
/// match rather than dynamic dispatch (§9's "dynamic dispatch over
/// detector set" design note).
pub enum DetectorKind {
    Curved(curved::CurvedDnaDetector),
    Slipped(slipped::SlippedDnaDetector),
    Cruciform(cruciform::CruciformDetector),
    RLoop(rloop::RLoopDetector),
    Triplex(triplex::TriplexDetector),
    GQuadruplex(g4::G4Detector),
    IMotif(imotif::IMotifDetector),
    ZDna(zdna::ZDnaDetector),
    APhilic(aphilic::APhilicDetector),
}

impl DetectorKind {
    pub fn all() -> Vec<DetectorKind> {
        vec![
            DetectorKind::Curved(curved::CurvedDnaDetector),
            DetectorKind::Slipped(slipped::SlippedDnaDetector),
            DetectorKind::Cruciform(cruciform::CruciformDetector),
            DetectorKind::RLoop(rloop::RLoopDetector),
            DetectorKind::Triplex(triplex::TriplexDetector),
            DetectorKind::GQuadruplex(g4::G4Detector),
            DetectorKind::IMotif(imotif::IMotifDetector),
            DetectorKind::ZDna(zdna::ZDnaDetector),
            DetectorKind::APhilic(aphilic::APhilicDetector),
        ]
    }

    pub fn from_name(name: &str) -> Option<DetectorKind> {
        DetectorKind::all()
            .into_iter()
            .find(|d| d.class().name() == name)
    }

    pub fn class(&self) -> MotifClass {
        match self {
            DetectorKind::Curved(d) => d.class(),
            DetectorKind::Slipped(d) => d.class(),
            DetectorKind::Cruciform(d) => d.class(),
            DetectorKind::RLoop(d) => d.class(),
            DetectorKind::Triplex(d) => d.class(),
            DetectorKind::GQuadruplex(d) => d.class(),
            DetectorKind::IMotif(d) => d.class(),
            DetectorKind::ZDna(d) => d.class(),
            DetectorKind::APhilic(d) => d.class(),
        }
    }

    pub fn detect_and_score(&self, ctx: &DetectContext) -> Vec<Candidate> {
        match self {
            DetectorKind::Curved(d) => d.detect_and_score(ctx),
            DetectorKind::Slipped(d) => d.detect_and_score(ctx),
            DetectorKind::Cruciform(d) => d.detect_and_score(ctx),
            DetectorKind::RLoop(d) => d.detect_and_score(ctx),
            DetectorKind::Triplex(d) => d.detect_and_score(ctx),
            DetectorKind::GQuadruplex(d) => d.detect_and_score(ctx),
            DetectorKind::IMotif(d) => d.detect_and_score(ctx),
            DetectorKind::ZDna(d) => d.detect_and_score(ctx),
            DetectorKind::APhilic(d) => d.detect_and_score(ctx),
        }
    }
}
