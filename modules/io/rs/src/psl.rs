use ahash::AHashSet;
use eyre::{ensure, Context, Result};

use alnmap_core_rs::align::{LocalAlignment, UngappedBlock};
use alnmap_core_rs::loc::{Interval, StrandPair};

use crate::traits::Parsed;

/// Signature opening the fixed 5-line header of a PSL buffer.
pub const SIGNATURE: &str = "psLayout";
const HEADER_LINES: usize = 5;

/// Alignment kind of a tabular buffer. The kind selects the coordinate
/// divisor applied to the target axis and is always an explicit caller
/// decision; it is never inferred from the buffer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PslKind {
    /// Plain nucleotide-vs-nucleotide alignment, coordinates used as given.
    #[default]
    DnaDna,
    /// Protein query aligned against translated DNA: target coordinates are
    /// folded into reading-frame units by dividing nucleotide positions by 3.
    ProtDna,
}

impl PslKind {
    fn target_divisor(&self) -> u64 {
        match self {
            PslKind::DnaDna => 1,
            PslKind::ProtDna => 3,
        }
    }
}

/// Parse a tabular alignment buffer (blat PSL output) with plain coordinates.
pub fn parse(buf: &str) -> Result<Parsed> {
    parse_translated(buf, PslKind::DnaDna)
}

/// Parse a tabular alignment buffer, folding target coordinates according to
/// the given alignment kind.
///
/// PSL coordinates are already 0-based half-open; per-block ends are computed
/// as `start + size` with no further correction. A single-character strand
/// field is mirrored to both sequences.
pub fn parse_translated(buf: &str, kind: PslKind) -> Result<Parsed> {
    ensure!(
        buf.starts_with(SIGNATURE),
        "Expected {SIGNATURE:?} at the start of a PSL buffer, found {:?}",
        buf.chars().take(SIGNATURE.len()).collect::<String>()
    );

    let mut alignments = Vec::new();
    let mut names = AHashSet::new();
    for (index, line) in buf.lines().enumerate().skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let alignment = parse_record(line, kind)
            .wrap_err_with(|| format!("Invalid PSL record at line {}", index + 1))?;
        names.insert(alignment.query_name().clone());
        names.insert(alignment.target_name().clone());
        alignments.push(alignment);
    }
    Ok(Parsed::new(alignments, names))
}

fn parse_record(line: &str, kind: PslKind) -> Result<LocalAlignment> {
    let fields: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
    ensure!(
        fields.len() >= 21,
        "PSL record has {} fields, expected at least 21",
        fields.len()
    );

    let orientation: StrandPair = fields[8].try_into().wrap_err("Invalid PSL strand field")?;
    let query_name = fields[9];
    let query_start = number(fields[11], "qStart")?;
    let query_end = number(fields[12], "qEnd")?;
    let target_name = fields[13];
    let target_start = number(fields[15], "tStart")?;
    let target_end = number(fields[16], "tEnd")?;
    let block_count = number(fields[17], "blockCount")? as usize;
    let sizes = comma_list(fields[18], "blockSizes")?;
    let query_starts = comma_list(fields[19], "qStarts")?;
    let target_starts = comma_list(fields[20], "tStarts")?;

    ensure!(block_count > 0, "PSL blockCount must be greater than 0");
    ensure!(
        sizes.len() == block_count
            && query_starts.len() == block_count
            && target_starts.len() == block_count,
        "PSL blockCount does not match the number of blocks in the record"
    );

    let divisor = kind.target_divisor();
    let mut blocks = Vec::with_capacity(block_count);
    for ((size, query_start), target_start) in sizes.iter().zip(&query_starts).zip(&target_starts)
    {
        let target_start = target_start / divisor;
        blocks.push(UngappedBlock::new(
            Interval::new(*query_start, query_start + size)?,
            Interval::new(target_start, target_start + size)?,
            None,
        )?);
    }

    LocalAlignment::new(
        None,
        query_name.to_owned(),
        target_name.to_owned(),
        Interval::new(query_start, query_end)?,
        Interval::new(target_start / divisor, target_end / divisor)?,
        orientation,
        blocks,
    )
}

fn number(field: &str, what: &str) -> Result<u64> {
    field
        .parse()
        .wrap_err_with(|| format!("Invalid PSL {what}: {field:?}"))
}

/// Trailing commas are allowed in the block lists, as in the tool output.
fn comma_list(field: &str, what: &str) -> Result<Vec<u64>> {
    field
        .strip_suffix(',')
        .unwrap_or(field)
        .split(',')
        .map(|x| number(x, what))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alnmap_core_rs::loc::IntervalOp;

    const HEADER: &str = "\
psLayout version 3

match\tmis- \trep. \tN's\tQ gap\tQ gap\tT gap\tT gap\tstrand\tQ        \tQ   \tQ    \tQ  \tT        \tT   \tT    \tT  \tblock\tblockSizes \tqStarts\ttStarts
     \tmatch\tmatch\t   \tcount\tbases\tcount\tbases\t      \tname     \tsize\tstart\tend\tname     \tsize\tstart\tend\tcount
---------------------------------------------------------------------------------------------------------------------------------------------------------------
";

    fn record(fields: &[&str]) -> String {
        format!("{HEADER}{}\n", fields.join("\t"))
    }

    const DNA_RECORD: &[&str] = &[
        "286", "0", "0", "0", "0", "0", "0", "0", "++", "testgenome4", "450", "64", "420",
        "testgenome1", "400", "64", "350", "2", "217,69,", "64,351,", "64,281,",
    ];

    const PROT_DNA_RECORD: &[&str] = &[
        "61", "0", "0", "0", "0", "0", "0", "0", "++", "HBB0_PAGBO", "147", "20", "106",
        "gi|171854975|dbj|AB364477.1|", "1461", "189", "963", "2", "36,25,", "20,81,",
        "189,738,",
    ];

    #[test]
    fn test_signature_mismatch() {
        for buf in ["", "#:lav\n", "psLayou\n", " psLayout version 3\n"] {
            assert!(parse(buf).is_err(), "Buffer: {buf:?}");
        }
    }

    #[test]
    fn test_header_only_buffer() -> Result<()> {
        let parsed = parse(HEADER)?;
        assert!(parsed.is_empty());
        assert!(parsed.names().is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_record() -> Result<()> {
        let parsed = parse(&record(DNA_RECORD))?;
        assert_eq!(parsed.alignments().len(), 1);
        assert_eq!(parsed.names().len(), 2);

        let aln = &parsed.alignments()[0];
        assert_eq!(aln.score(), &None);
        assert_eq!(aln.query_name(), "testgenome4");
        assert_eq!(aln.target_name(), "testgenome1");
        assert_eq!(*aln.query(), (64, 420));
        assert_eq!(*aln.target(), (64, 350));
        assert_eq!(aln.orientation().to_string(), "++");
        assert_eq!(aln.blocks().len(), 2);

        let last = aln.blocks().last().unwrap();
        assert_eq!(*last.query(), (351, 351 + 69));
        assert_eq!(*last.target(), (281, 281 + 69));
        Ok(())
    }

    #[test]
    fn test_block_ends_are_start_plus_size() -> Result<()> {
        let parsed = parse(&record(DNA_RECORD))?;
        let aln = &parsed.alignments()[0];
        for (block, size) in aln.blocks().iter().zip([217u64, 69]) {
            assert_eq!(block.query().end(), block.query().start() + size);
            assert_eq!(block.target().end(), block.target().start() + size);
        }
        Ok(())
    }

    #[test]
    fn test_single_character_strand_is_mirrored() -> Result<()> {
        let mut fields = DNA_RECORD.to_vec();
        fields[8] = "-";
        let parsed = parse(&record(&fields))?;
        assert_eq!(parsed.alignments()[0].orientation().to_string(), "--");
        Ok(())
    }

    #[test]
    fn test_translated_target_axis() -> Result<()> {
        let parsed = parse_translated(&record(PROT_DNA_RECORD), PslKind::ProtDna)?;
        let aln = &parsed.alignments()[0];

        assert_eq!(aln.query_name(), "HBB0_PAGBO");
        assert_eq!(aln.target_name(), "gi|171854975|dbj|AB364477.1|");
        assert_eq!(*aln.query(), (20, 106));
        assert_eq!(*aln.target(), (63, 321));
        assert_eq!(aln.blocks().len(), 2);

        let last = aln.blocks().last().unwrap();
        assert_eq!(*last.query(), (81, 81 + 25));
        assert_eq!(*last.target(), (246, 246 + 25));
        Ok(())
    }

    #[test]
    fn test_kind_is_explicit_not_inferred() -> Result<()> {
        // The same buffer parses under both kinds with different coordinates
        let plain = parse_translated(&record(PROT_DNA_RECORD), PslKind::DnaDna)?;
        assert_eq!(*plain.alignments()[0].target(), (189, 963));

        let folded = parse_translated(&record(PROT_DNA_RECORD), PslKind::ProtDna)?;
        assert_eq!(*folded.alignments()[0].target(), (63, 321));
        Ok(())
    }

    #[test]
    fn test_block_count_mismatch() {
        for (index, value) in [(17, "3"), (18, "217,"), (20, "64,281,999,")] {
            let mut fields = DNA_RECORD.to_vec();
            fields[index] = value;
            assert!(parse(&record(&fields)).is_err(), "Field {index} = {value:?}");
        }
    }

    #[test]
    fn test_truncated_record() {
        let fields = &DNA_RECORD[..20];
        assert!(parse(&record(fields)).is_err());
    }
}
