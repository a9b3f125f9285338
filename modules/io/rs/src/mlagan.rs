use ahash::AHashSet;
use eyre::{ensure, Result};
use itertools::Itertools;

use crate::gfasta;
use crate::traits::Parsed;

/// Parse an N-ary gapped FASTA alignment (mlagan output).
///
/// The multiple alignment is decomposed into one pairwise alignment per
/// unordered pair of records, each pair going through the gap scan on its
/// own. Pairs without a shared residue column are dropped.
pub fn parse(buf: &str) -> Result<Parsed> {
    let records = gfasta::read(buf)?;
    ensure!(
        records.len() >= 2,
        "N-ary gapped FASTA must have at least 2 records, found {}",
        records.len()
    );

    let names: AHashSet<String> = records.iter().map(|x| x.name().clone()).collect();
    let mut alignments = Vec::new();
    for (query, target) in records.iter().tuple_combinations() {
        if let Some(alignment) = gfasta::pair_alignment(query, target)? {
            alignments.push(alignment);
        }
    }
    Ok(Parsed::new(alignments, names))
}
