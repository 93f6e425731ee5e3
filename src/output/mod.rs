//! Output Assembly L5 (§6), one writer per `--formats` entry. Every
//! writer takes the fully resolved, normalized candidate stream plus a
//! [`crate::viz::VisualizationSummary`] where the format needs
//! sequence-wide binning (`bedgraph`) and writes straight to
//! `{out_prefix}.{ext}`.

mod bed;
mod bedgraph;
mod csv_writer;
mod gff3;

pub use bed::write_bed;
pub use bedgraph::write_bedgraph;
pub use csv_writer::write_csv;
pub use gff3::write_gff3;
