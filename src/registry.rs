//! L0 Pattern Registry: a static catalog of regex patterns tagged by class,
//! subclass and priority weight. Two views are exposed: the set compiled
//! into the scan substrate (`src/scan.rs`), and the set that must run
//! through the hand-rolled backtracking matchers in `src/fallback.rs`
//! because `regex` supports neither backreferences nor lookaround.

use fnv::FnvHasher;
use once_cell::sync::Lazy;
use regex::Regex;
use std::hash::{Hash, Hasher};

use crate::candidate::MotifClass;

/// A single compiled pattern entry. `weight` encodes the subclass priority
/// used for `SCIENTIFIC_PRIORITY` tie-breaking within a class (lower wins),
/// matching the source registry's canonical > relaxed > bulged > ...
/// ordering for G4 and i-motif.
pub struct MotifPattern {
    pub motif_id: usize,
    pub class: MotifClass,
    pub subclass: &'static str,
    pub weight: u8,
    pub pattern_name: &'static str,
    pub source: &'static str,
    pub compiled: Regex,
}

/// Conservative literal-source scan for backreference/lookaround
/// constructs. A pattern failing this check cannot be compiled by `regex`
/// at all and must be handled by a hand-rolled matcher instead.
pub fn is_scan_safe(source: &str) -> bool {
    const UNSAFE_MARKERS: [&str; 4] = ["(?P=", "(?#", "(?=", "(?!"];
    if UNSAFE_MARKERS.iter().any(|m| source.contains(m)) {
        return false;
    }
    if source.contains("\\k<") {
        return false;
    }
    let bytes = source.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
            let d = bytes[i + 1];
            if (b'1'..=b'9').contains(&d) {
                return false;
            }
        }
    }
    true
}

struct RawPattern {
    class: MotifClass,
    subclass: &'static str,
    weight: u8,
    pattern_name: &'static str,
    source: &'static str,
}

/// Subclass priority follows the source registry's documented ordering:
/// canonical > relaxed > bulged > imperfect > multimeric > bipartite >
/// g_triplex for G4; canonical > relaxed for i-motif.
const RAW_PATTERNS: &[RawPattern] = &[
    RawPattern {
        class: MotifClass::GQuadruplex,
        subclass: "canonical_G4",
        weight: 1,
        pattern_name: "g4_canonical",
        source: r"G{3,}[ACGTN]{1,7}G{3,}[ACGTN]{1,7}G{3,}[ACGTN]{1,7}G{3,}",
    },
    RawPattern {
        class: MotifClass::GQuadruplex,
        subclass: "relaxed_G4",
        weight: 2,
        pattern_name: "g4_relaxed",
        source: r"G{3,}[ACGTN]{1,12}G{3,}[ACGTN]{1,12}G{3,}[ACGTN]{1,12}G{3,}",
    },
    RawPattern {
        class: MotifClass::GQuadruplex,
        subclass: "bulged_G4",
        weight: 3,
        pattern_name: "g4_bulged",
        source: r"G{3,}[ACGTN]{0,3}G{1,2}[ACGTN]{1,7}G{3,}[ACGTN]{1,7}G{3,}[ACGTN]{1,7}G{3,}",
    },
    RawPattern {
        class: MotifClass::GQuadruplex,
        subclass: "bipartite_G4",
        weight: 6,
        pattern_name: "g4_bipartite",
        source: r"G{3,}[ACGTN]{1,7}G{3,}[ACGTN]{1,7}G{3,}[ACGTN]{8,30}G{3,}[ACGTN]{1,7}G{3,}[ACGTN]{1,7}G{3,}",
    },
    RawPattern {
        class: MotifClass::IMotif,
        subclass: "canonical_i_motif",
        weight: 1,
        pattern_name: "imotif_canonical",
        source: r"C{3,}[ACGTN]{1,7}C{3,}[ACGTN]{1,7}C{3,}[ACGTN]{1,7}C{3,}",
    },
    RawPattern {
        class: MotifClass::IMotif,
        subclass: "relaxed_i_motif",
        weight: 2,
        pattern_name: "imotif_relaxed",
        source: r"C{3,}[ACGTN]{1,12}C{3,}[ACGTN]{1,12}C{3,}[ACGTN]{1,12}C{3,}",
    },
    RawPattern {
        class: MotifClass::Triplex,
        subclass: "homopurine",
        weight: 1,
        pattern_name: "triplex_purine",
        source: r"[AGN]{15,}",
    },
    RawPattern {
        class: MotifClass::Triplex,
        subclass: "homopyrimidine",
        weight: 2,
        pattern_name: "triplex_pyrimidine",
        source: r"[CTN]{15,}",
    },
    RawPattern {
        class: MotifClass::RLoop,
        subclass: "rlfs_m1",
        weight: 1,
        pattern_name: "rloop_m1",
        source: r"G{3,}[ACGTN]{1,10}G{3,}(?:[ACGTN]{1,10}G{3,}){1,}",
    },
    RawPattern {
        class: MotifClass::RLoop,
        subclass: "rlfs_m2",
        weight: 2,
        pattern_name: "rloop_m2",
        source: r"G{4,}(?:[ACGTN]{1,10}G{4,}){1,}",
    },
];

pub struct PatternRegistry {
    patterns: Vec<MotifPattern>,
}

impl PatternRegistry {
    fn build() -> Self {
        let mut patterns = Vec::with_capacity(RAW_PATTERNS.len());
        for (motif_id, raw) in RAW_PATTERNS.iter().enumerate() {
            debug_assert!(
                is_scan_safe(raw.source),
                "pattern {} is not scan-safe but has no fallback entry",
                raw.pattern_name
            );
            match Regex::new(raw.source) {
                Ok(compiled) => patterns.push(MotifPattern {
                    motif_id,
                    class: raw.class,
                    subclass: raw.subclass,
                    weight: raw.weight,
                    pattern_name: raw.pattern_name,
                    source: raw.source,
                    compiled,
                }),
                Err(e) => {
                    log::warn!(
                        "pattern {} failed to compile, demoted: {e}",
                        raw.pattern_name
                    );
                }
            }
        }
        PatternRegistry { patterns }
    }

    pub fn global() -> &'static PatternRegistry {
        static REGISTRY: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::build);
        &REGISTRY
    }

    pub fn patterns_for_class(&self, class: MotifClass) -> impl Iterator<Item = &MotifPattern> {
        self.patterns.iter().filter(move |p| p.class == class)
    }
}

/// Content-hash fingerprint for a pattern subset, used to key the
/// compilation cache per §4.2 ("cacheable keyed by the pattern set's
/// content hash"). The global registry is compiled once regardless, but
/// this is exposed for callers that build scoped subsets (`--classes`).
pub fn fingerprint(classes: &[MotifClass]) -> u64 {
    let mut hasher = FnvHasher::default();
    for class in classes {
        class.name().hash(&mut hasher);
    }
    hasher.finish()
}
