use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Context, OptionExt, Result};

use alnmap_core_rs::align::{gapscan, LocalAlignment, UngappedBlock};
use alnmap_core_rs::loc::{Interval, IntervalOp, StrandPair};

/// One record of a gapped FASTA buffer: the sequence name (first whitespace
/// token of the header) and the gapped row with all line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq, Dissolve, Getters)]
pub struct GappedRecord {
    name: String,
    row: String,
}

/// Split a gapped FASTA buffer into records. Records run from one `>` marker
/// to the next; the remainder of the header line past the name is ignored.
pub fn read(buf: &str) -> Result<Vec<GappedRecord>> {
    ensure!(
        buf.starts_with('>'),
        "Expected '>' at the start of a gapped FASTA buffer, found {:?}",
        buf.chars().next()
    );

    let markers: Vec<usize> = buf.match_indices('>').map(|(i, _)| i).collect();
    let mut records = Vec::with_capacity(markers.len());
    for (index, &start) in markers.iter().enumerate() {
        let end = markers.get(index + 1).copied().unwrap_or(buf.len());
        let record = parse_record(&buf[start..end])
            .wrap_err_with(|| format!("Invalid gapped FASTA record at byte {start}"))?;
        records.push(record);
    }
    Ok(records)
}

fn parse_record(record: &str) -> Result<GappedRecord> {
    let (header, body) = record[1..].split_once('\n').unwrap_or((&record[1..], ""));
    let name = header
        .split_whitespace()
        .next()
        .ok_or_eyre("Record without a sequence name")?;
    let row: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    ensure!(!row.is_empty(), "Record {name:?} has no gapped row");
    Ok(GappedRecord {
        name: name.to_owned(),
        row,
    })
}

/// Pair two gapped rows into a local alignment.
///
/// Rows of a gapped FASTA file carry whole sequences, so the ungapped run
/// coordinates are already absolute and need no shifting. The overall span
/// stretches from the first to the last aligned residue on each axis; a pair
/// whose rows never overlap on a residue column yields no alignment at all.
pub(crate) fn pair_alignment(
    query: &GappedRecord,
    target: &GappedRecord,
) -> Result<Option<LocalAlignment>> {
    let runs = gapscan::extract(query.row(), target.row())?;
    let Some((first, last)) = runs.first().zip(runs.last()) else {
        return Ok(None);
    };

    let span = (
        Interval::new(first.a().start(), last.a().end())?,
        Interval::new(first.b().start(), last.b().end())?,
    );
    let blocks = runs
        .iter()
        .map(|run| UngappedBlock::new(*run.a(), *run.b(), None))
        .collect::<Result<Vec<_>>>()?;

    LocalAlignment::new(
        None,
        query.name().clone(),
        target.name().clone(),
        span.0,
        span.1,
        StrandPair::default(),
        blocks,
    )
    .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_mismatch() {
        for buf in ["", "#:lav\n", "ACGT\n>one\nACGT\n"] {
            assert!(read(buf).is_err(), "Buffer: {buf:?}");
        }
    }

    #[test]
    fn test_read_records() -> Result<()> {
        let records = read(">alpha some description\nACGT-ACG\nT\n>beta\nACGTTACGT\n")?;
        assert_eq!(
            records,
            vec![
                GappedRecord {
                    name: "alpha".to_owned(),
                    row: "ACGT-ACGT".to_owned(),
                },
                GappedRecord {
                    name: "beta".to_owned(),
                    row: "ACGTTACGT".to_owned(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_nameless_record() {
        assert!(read(">\nACGT\n").is_err());
        assert!(read(">one\nACGT\n> \nACGT\n").is_err());
    }

    #[test]
    fn test_rowless_record() {
        // A record without residues is a structural error, not an empty row
        for buf in [">one", ">one\n", ">one\n>two\nACGT\n"] {
            assert!(read(buf).is_err(), "Buffer: {buf:?}");
        }
    }

    #[test]
    fn test_pair_alignment_spans_aligned_residues() -> Result<()> {
        let records = read(">a\n--CGTA\n>b\nACCGT-\n")?;
        let aln = pair_alignment(&records[0], &records[1])?
            .ok_or_eyre("Expected an alignment")?;

        assert_eq!(*aln.query(), (0, 3));
        assert_eq!(*aln.target(), (2, 5));
        assert_eq!(aln.blocks().len(), 1);
        Ok(())
    }

    #[test]
    fn test_pair_without_overlap() -> Result<()> {
        let records = read(">a\nAC--\n>b\n--GT\n")?;
        assert!(pair_alignment(&records[0], &records[1])?.is_none());
        Ok(())
    }
}
