use ahash::AHashSet;
use eyre::{ensure, Result};

use crate::gfasta;
use crate::traits::Parsed;

/// Parse a pairwise gapped FASTA alignment (lagan output).
///
/// The buffer must carry exactly two records; their rows go through the gap
/// scan as-is since the coordinates of a whole-sequence row are absolute.
pub fn parse(buf: &str) -> Result<Parsed> {
    let records = gfasta::read(buf)?;
    ensure!(
        records.len() == 2,
        "Pairwise gapped FASTA must have exactly 2 records, found {}",
        records.len()
    );

    let names: AHashSet<String> = records.iter().map(|x| x.name().clone()).collect();
    let alignments = gfasta::pair_alignment(&records[0], &records[1])?
        .into_iter()
        .collect();
    Ok(Parsed::new(alignments, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alnmap_core_rs::loc::IntervalOp;

    const OUTPUT: &str = ">alpha lagan output\nACGT-ACG\nT\n>beta\nACGTTACGT\n";

    #[test]
    fn test_signature_mismatch() {
        for buf in ["", "psLayout version 3\n", "alpha\nACGT\n"] {
            assert!(parse(buf).is_err(), "Buffer: {buf:?}");
        }
    }

    #[test]
    fn test_record_count() {
        assert!(parse(">one\nAC\n").is_err());
        assert!(parse(">one\nAC\n>two\nAC\n>three\nAC\n").is_err());
    }

    #[test]
    fn test_parse_output() -> Result<()> {
        let parsed = parse(OUTPUT)?;

        let expected: AHashSet<String> = ["alpha".to_owned(), "beta".to_owned()]
            .into_iter()
            .collect();
        assert_eq!(parsed.names(), &expected);
        assert_eq!(parsed.alignments().len(), 1);

        let aln = &parsed.alignments()[0];
        assert_eq!(aln.score(), &None);
        assert_eq!(aln.query_name(), "alpha");
        assert_eq!(aln.target_name(), "beta");
        assert_eq!(*aln.query(), (0, 8));
        assert_eq!(*aln.target(), (0, 9));
        assert_eq!(aln.orientation().to_string(), "++");

        let blocks: Vec<_> = aln
            .blocks()
            .iter()
            .map(|x| (x.query().start(), x.query().end(), x.target().start(), x.target().end()))
            .collect();
        assert_eq!(blocks, vec![(0, 4, 0, 4), (4, 8, 5, 9)]);
        Ok(())
    }

    #[test]
    fn test_disjoint_rows_yield_names_only() -> Result<()> {
        // Two records that never overlap on a residue column still name their
        // sequences, there is just nothing aligned.
        let parsed = parse(">one\nAC--\n>two\n--GT\n")?;
        assert!(parsed.is_empty());
        assert_eq!(parsed.names().len(), 2);
        Ok(())
    }
}
