use ahash::AHashSet;
use eyre::{ensure, Context, OptionExt, Result};
use log::debug;

use alnmap_core_rs::align::{LocalAlignment, UngappedBlock};
use alnmap_core_rs::loc::{Interval, StrandPair};

use crate::traits::Parsed;

/// Marker token opening every section of a LAV buffer.
pub const MARKER: &str = "#:lav";

/// Parse marker-delimited gapped local alignments (blastz LAV output).
///
/// Sections are delimited by consecutive `#:lav` markers; each section names
/// exactly two sequences in its `h` stanza and carries zero or more `a {}`
/// alignment records. LAV coordinates are 1-based inclusive and are converted
/// to 0-based half-open here: every start is decremented, ends pass through.
pub fn parse(buf: &str) -> Result<Parsed> {
    ensure!(
        buf.starts_with(MARKER),
        "Expected {MARKER:?} at the start of a LAV buffer, found {:?}",
        buf.chars().take(MARKER.len()).collect::<String>()
    );

    let mut alignments = Vec::new();
    let mut names = AHashSet::new();
    for (start, end) in sections(buf) {
        parse_section(&buf[start..end], &mut alignments, &mut names)
            .wrap_err_with(|| format!("Invalid LAV section at byte {start}"))?;
    }
    Ok(Parsed::new(alignments, names))
}

/// Offsets of consecutive marker pairs delimiting the alignment sections. The
/// scan starts right after the leading marker, so the opening summary section
/// (the one with the `d` stanza) is never searched for records.
fn sections(buf: &str) -> Vec<(usize, usize)> {
    let markers: Vec<usize> = buf[1..].match_indices(MARKER).map(|(i, _)| i + 1).collect();
    markers
        .iter()
        .enumerate()
        .map(|(i, &start)| (start, markers.get(i + 1).copied().unwrap_or(buf.len())))
        .collect()
}

fn parse_section(
    section: &str,
    alignments: &mut Vec<LocalAlignment>,
    names: &mut AHashSet<String>,
) -> Result<()> {
    let records: Vec<&str> = section.split("\n}\n").collect();

    let (query_name, target_name) = section_names(&records)?;
    names.insert(query_name.clone());
    names.insert(target_name.clone());

    for (index, record) in records.iter().enumerate() {
        let lines: Vec<&str> = record
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        // The chunk after the last closing brace is empty by construction
        if lines.is_empty() {
            continue;
        }

        ensure!(
            lines[0].as_bytes().get(2) == Some(&b'{'),
            "Malformed LAV stanza header: {:?}",
            lines[0]
        );
        match lines[0].as_bytes()[0] {
            b'a' => {
                let alignment = parse_record(&lines[1..], &query_name, &target_name)
                    .wrap_err_with(|| format!("Invalid LAV alignment record {index}"))?;
                alignments.push(alignment);
            }
            // Other stanza types legitimately interleave with alignment records
            tag => debug!("Skipping LAV stanza {:?}", tag as char),
        }
    }
    Ok(())
}

fn section_names(records: &[&str]) -> Result<(String, String)> {
    let stanza = records.get(1).ok_or_eyre("LAV section has no header stanza")?;
    let pos = stanza.find('h').ok_or_eyre("LAV section has no 'h' stanza")?;

    let (query, next) =
        quoted_name(stanza, pos).ok_or_eyre("LAV 'h' stanza names no query sequence")?;
    let (target, _) =
        quoted_name(stanza, next).ok_or_eyre("LAV 'h' stanza names no target sequence")?;
    Ok((query, target))
}

/// Text between a '>' and the following '"', per the quoted-filename
/// convention of the `h` stanza. Returns the name and the offset to resume
/// scanning from.
fn quoted_name(stanza: &str, from: usize) -> Option<(String, usize)> {
    let gt = from + stanza[from..].find('>')?;
    let quote = gt + stanza[gt..].find('"')?;
    Some((stanza[gt + 1..quote].to_owned(), quote + 1))
}

fn parse_record(lines: &[&str], query_name: &str, target_name: &str) -> Result<LocalAlignment> {
    let mut score = None;
    let mut begin = None;
    let mut end = None;
    let mut blocks = Vec::new();

    for line in lines {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("s") => {
                ensure!(score.is_none(), "Duplicate score line: {line:?}");
                let value = fields.next().ok_or_eyre("Score line without a value")?;
                score = Some(value.parse::<i64>().wrap_err("Invalid score")?);
            }
            Some("b") => {
                ensure!(begin.is_none(), "Duplicate begin-coordinates line: {line:?}");
                begin = Some(coord_pair(&mut fields).wrap_err("Invalid begin coordinates")?);
            }
            Some("e") => {
                ensure!(end.is_none(), "Duplicate end-coordinates line: {line:?}");
                end = Some(coord_pair(&mut fields).wrap_err("Invalid end coordinates")?);
            }
            Some("l") => {
                let block = parse_block(&mut fields)
                    .wrap_err_with(|| format!("Invalid ungapped block line: {line:?}"))?;
                blocks.push(block);
            }
            // Remaining record lines are not part of the parsed subset
            _ => {}
        }
    }

    let score = score.ok_or_eyre("LAV record without a score line")?;
    let (query_begin, target_begin) = begin.ok_or_eyre("LAV record without begin coordinates")?;
    let (query_end, target_end) = end.ok_or_eyre("LAV record without end coordinates")?;

    LocalAlignment::new(
        Some(score),
        query_name.to_owned(),
        target_name.to_owned(),
        to_half_open(query_begin, query_end)?,
        to_half_open(target_begin, target_end)?,
        // The parsed LAV subset does not expose strand; orientation is fixed
        // at "++" until the strand stanzas are handled.
        StrandPair::default(),
        blocks,
    )
}

fn parse_block<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Result<UngappedBlock> {
    let (query_begin, target_begin) = coord_pair(fields)?;
    let (query_end, target_end) = coord_pair(fields)?;
    let identity = fields
        .next()
        .ok_or_eyre("Missing percent identity")?
        .parse::<u8>()
        .wrap_err("Invalid percent identity")?;

    UngappedBlock::new(
        to_half_open(query_begin, query_end)?,
        to_half_open(target_begin, target_end)?,
        Some(identity),
    )
}

fn coord_pair<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Result<(u64, u64)> {
    let query = fields.next().ok_or_eyre("Missing query coordinate")?;
    let target = fields.next().ok_or_eyre("Missing target coordinate")?;
    Ok((
        query.parse().wrap_err("Invalid query coordinate")?,
        target.parse().wrap_err("Invalid target coordinate")?,
    ))
}

/// A 1-based inclusive [begin, end] pair equals the 0-based half-open
/// [begin - 1, end) pair.
fn to_half_open(begin: u64, end: u64) -> Result<Interval<u64>> {
    ensure!(begin >= 1, "LAV coordinates are 1-based, got a zero start");
    Interval::new(begin - 1, end).wrap_err("Begin coordinate is beyond the end coordinate")
}
