use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller (§7: "surfaced to caller" tier).
///
/// Locally-recovered failures (pattern compilation demotions, per-chunk
/// detector panics, missing spill files) are not represented here — they
/// are logged in place and folded into a [`crate::executor::PipelineReport`].
#[derive(Error, Debug)]
pub enum NonBError {
    #[error("failed to read input at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid FASTA record {record}: {reason}")]
    InvalidFasta { record: String, reason: String },

    #[error("no scan-safe or fallback patterns compiled for class {class_name}")]
    PatternCompilation { class_name: String },

    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown motif class name: {0}")]
    UnknownClass(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
