use eyre::Result;

use crate::traits::Parsed;
use crate::{clustal, lagan, lav, mlagan, psl};

/// Closed set of supported alignment-tool output formats. Dispatch is always
/// an explicit match driven by the caller; a buffer is never probed to guess
/// its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Marker-delimited gapped local alignments (blastz LAV).
    Lav,
    /// Tabular alignments, one record per line (blat PSL).
    Psl,
    /// Column-block multiple sequence alignment (clustalw ALN).
    Clustal,
    /// Pairwise gapped FASTA (lagan).
    Lagan,
    /// N-ary gapped FASTA (mlagan).
    Mlagan,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Lav => "lav",
            Format::Psl => "psl",
            Format::Clustal => "clustal",
            Format::Lagan => "lagan",
            Format::Mlagan => "mlagan",
        }
    }

    /// Parse the buffer as this format and return the canonical alignments
    /// plus the participating sequence names.
    pub fn parse(&self, buf: &str) -> Result<Parsed> {
        match self {
            Format::Lav => lav::parse(buf),
            Format::Psl => psl::parse(buf),
            Format::Clustal => clustal::parse(buf),
            Format::Lagan => lagan::parse(buf),
            Format::Mlagan => mlagan::parse(buf),
        }
    }
}
