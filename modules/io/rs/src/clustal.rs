use ahash::AHashSet;
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Context, Result};
use itertools::Itertools;

use alnmap_core_rs::align::gapscan::{self, GAP};
use alnmap_core_rs::align::{LocalAlignment, UngappedBlock};
use alnmap_core_rs::loc::{Interval, StrandPair};

use crate::traits::Parsed;

/// Signature opening a clustalw alignment buffer, trailing space included.
pub const SIGNATURE: &str = "CLUSTAL ";
const HEADER_LINES: usize = 3;
/// Width of the name column; a line is a sequence line iff this prefix is
/// not blank.
const NAME_COLUMN: usize = 16;

/// One column block of a clustalw alignment: up to 60 columns from every
/// sequence, plus the 0-based inclusive coordinates each row occupies on its
/// ungapped sequence.
///
/// A row made of gaps only contributes no residues; its start is pulled back
/// by one so that `start == end` pins the row just before the position where
/// it resumes in a later block. That correction is why coordinates are signed:
/// an all-gap row in the first block sits at -1.
#[derive(Debug, Clone, PartialEq, Eq, Dissolve, Getters)]
pub struct ColumnAlignmentBlock {
    names: Vec<String>,
    rows: Vec<String>,
    starts: Vec<i64>,
    ends: Vec<i64>,
}

impl ColumnAlignmentBlock {
    /// Gap-stripped length of every row in the block.
    pub fn ungapped(&self) -> Vec<i64> {
        self.rows
            .iter()
            .map(|row| row.bytes().filter(|x| *x != GAP).count() as i64)
            .collect()
    }
}

/// Read the column blocks of a clustalw buffer without pairing them up.
///
/// The number of sequences is taken from the run of consecutive sequence
/// lines right after the 3-line header; every block is then expected to span
/// that many lines plus the conservation and separator lines. Per-row
/// coordinates accumulate across blocks.
pub fn read(buf: &str) -> Result<Vec<ColumnAlignmentBlock>> {
    ensure!(
        buf.starts_with(SIGNATURE),
        "Expected {SIGNATURE:?} at the start of a clustal buffer, found {:?}",
        buf.chars().take(SIGNATURE.len()).collect::<String>()
    );

    let lines: Vec<&str> = buf
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .skip(HEADER_LINES)
        .collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Ok(Vec::new());
    }

    let row_count = lines.iter().take_while(|x| is_sequence_line(x)).count();
    ensure!(row_count > 0, "Expected sequence lines right after the clustal header");

    let mut blocks = Vec::new();
    let mut running = vec![0i64; row_count];
    for chunk in lines.chunks(row_count + 2) {
        if chunk.iter().all(|line| line.trim().is_empty()) {
            break;
        }
        ensure!(
            chunk.len() >= row_count,
            "Truncated column block: {} sequence lines instead of {row_count}",
            chunk.len()
        );

        let mut names = Vec::with_capacity(row_count);
        let mut rows = Vec::with_capacity(row_count);
        for line in &chunk[..row_count] {
            let fields: Vec<&str> = line.split_whitespace().collect();
            // The trailing cumulative-length column is optional and ignored
            ensure!(
                fields.len() == 2 || fields.len() == 3,
                "Malformed clustal sequence line: {line:?}"
            );
            names.push(fields[0].to_owned());
            rows.push(fields[1].to_owned());
        }

        let mut block = ColumnAlignmentBlock {
            names,
            rows,
            starts: running.clone(),
            ends: Vec::with_capacity(row_count),
        };
        let ungapped = block.ungapped();
        for i in 0..row_count {
            running[i] += ungapped[i];
            if ungapped[i] == 0 {
                block.starts[i] -= 1;
                block.ends.push(block.starts[i]);
            } else {
                block.ends.push(block.starts[i] + ungapped[i] - 1);
            }
        }
        blocks.push(block);
    }
    Ok(blocks)
}

/// Parse a clustalw column-block alignment into pairwise local alignments.
///
/// Every column block is decomposed into one alignment per unordered pair of
/// sequences with residues in that block: the pair's rows go through the
/// gap scan and the resulting runs are shifted by the rows' block starts.
/// Pairs whose rows never overlap on a residue column produce nothing.
pub fn parse(buf: &str) -> Result<Parsed> {
    let blocks = read(buf)?;
    let Some(first) = blocks.first() else {
        return Ok(Parsed::default());
    };

    let names: AHashSet<String> = first.names().iter().cloned().collect();

    let mut alignments = Vec::new();
    for block in &blocks {
        ensure!(
            block.names() == first.names(),
            "Sequence names changed between column blocks: {:?} vs {:?}",
            first.names(),
            block.names()
        );
        for (i, j) in (0..block.names().len()).tuple_combinations() {
            if let Some(alignment) = pair_alignment(block, i, j)? {
                alignments.push(alignment);
            }
        }
    }
    Ok(Parsed::new(alignments, names))
}

fn is_sequence_line(line: &str) -> bool {
    line.chars().take(NAME_COLUMN).any(|c| !c.is_whitespace())
}

fn pair_alignment(
    block: &ColumnAlignmentBlock,
    i: usize,
    j: usize,
) -> Result<Option<LocalAlignment>> {
    let ungapped = block.ungapped();
    if ungapped[i] == 0 || ungapped[j] == 0 {
        return Ok(None);
    }

    let runs = gapscan::extract(&block.rows()[i], &block.rows()[j])?;
    if runs.is_empty() {
        return Ok(None);
    }

    let query = row_span(block, i)?;
    let target = row_span(block, j)?;
    let blocks = runs
        .iter()
        .map(|run| {
            UngappedBlock::new(
                run.a().shifted(query.0),
                run.b().shifted(target.0),
                None,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    LocalAlignment::new(
        None,
        block.names()[i].clone(),
        block.names()[j].clone(),
        Interval::new(query.0, query.1)?,
        Interval::new(target.0, target.1)?,
        StrandPair::default(),
        blocks,
    )
    .map(Some)
}

/// Half-open span a row with residues occupies on its sequence. Rows with
/// residues never carry the negative all-gap correction.
fn row_span(block: &ColumnAlignmentBlock, row: usize) -> Result<(u64, u64)> {
    let start = u64::try_from(block.starts()[row]).wrap_err("Negative row start")?;
    let end = u64::try_from(block.ends()[row]).wrap_err("Negative row end")?;
    Ok((start, end + 1))
}
