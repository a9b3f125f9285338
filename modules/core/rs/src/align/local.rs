use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use crate::loc::{Interval, IntervalOp, StrandPair};

use super::block::UngappedBlock;

/// One gapped local alignment between two named sequences, decomposed into
/// maximal ungapped blocks. All coordinates are 0-based, half-open; strand
/// signs are carried per sequence. Multi-sequence alignments are decomposed
/// into pairwise instances before reaching this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Dissolve, Getters)]
pub struct LocalAlignment {
    /// Alignment score; reported by the block-marker format only.
    score: Option<i64>,
    query_name: String,
    target_name: String,
    /// Overall span of the alignment on the query sequence.
    query: Interval<u64>,
    /// Overall span of the alignment on the target sequence.
    target: Interval<u64>,
    orientation: StrandPair,
    blocks: Vec<UngappedBlock>,
}

impl LocalAlignment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        score: Option<i64>,
        query_name: String,
        target_name: String,
        query: Interval<u64>,
        target: Interval<u64>,
        orientation: StrandPair,
        blocks: Vec<UngappedBlock>,
    ) -> Result<Self> {
        Self::validate_blocks(&blocks)?;
        Ok(Self {
            score,
            query_name,
            target_name,
            query,
            target,
            orientation,
            blocks,
        })
    }

    /// Blocks must be non-empty and strictly increasing without overlaps on
    /// both coordinate axes, in emission order.
    fn validate_blocks(blocks: &[UngappedBlock]) -> Result<()> {
        ensure!(!blocks.is_empty(), "Local alignment must have at least one ungapped block");
        for (prev, next) in blocks.iter().zip(blocks.iter().skip(1)) {
            ensure!(
                prev.query().end() <= next.query().start(),
                "Ungapped blocks overlap or are out of order on the query axis: {} and {}",
                prev.query(),
                next.query(),
            );
            ensure!(
                prev.target().end() <= next.target().start(),
                "Ungapped blocks overlap or are out of order on the target axis: {} and {}",
                prev.target(),
                next.target(),
            );
        }
        Ok(())
    }
}
