use eyre::{Context, Result};
use log::debug;

use alnmap_core_rs::loc::Locus;
use alnmap_io_rs::Parsed;

use crate::traits::{IntervalIndex, SequenceDb};

/// Feed parsed alignments into an interval index.
///
/// Every participating name is resolved against the sequence database and
/// registered first; an unresolvable name aborts the feed before anything is
/// inserted. Each ungapped block then becomes one `insert` of a query locus
/// against a target locus, with strands taken from the alignment's
/// orientation and coordinates passed through untouched. The index is built
/// exactly once at the end.
pub fn feed<Db, Index>(parsed: &Parsed, db: &Db, mut index: Index) -> Result<Index::Built>
where
    Db: SequenceDb,
    Index: IntervalIndex,
{
    for name in parsed.names() {
        db.sequence(name)
            .wrap_err_with(|| format!("Can't resolve sequence {name:?}"))?;
        index.register(name);
    }

    let mut blocks = 0usize;
    for alignment in parsed.alignments() {
        let orientation = alignment.orientation();
        for block in alignment.blocks() {
            index.insert(
                Locus::new(
                    alignment.query_name().clone(),
                    *block.query(),
                    orientation.query(),
                ),
                Locus::new(
                    alignment.target_name().clone(),
                    *block.target(),
                    orientation.target(),
                ),
            );
            blocks += 1;
        }
    }
    debug!(
        "Fed {blocks} locus pairs from {} alignments into the index",
        parsed.alignments().len()
    );
    index.build()
}
