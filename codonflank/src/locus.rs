//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Locus records parsed from the updated data TSV.

use serde::Deserialize;

use std::fmt;

use crate::{
    consts::{CODON_LEN, COL_END, COL_MUT_POS, COL_START},
    error::{FlankError, Result},
};

/// A table row as read from disk, before any numeric validation.
///
/// Only the consumed columns are named; the remaining columns of the table
/// (gene, strand, flipped, src_codon) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocus {
    pub aid: String,
    pub contig: String,
    pub start: String,
    pub end: String,
    pub tgt_codon: String,
    pub mut_pos: String,
}

/// One codon substitution event.
///
/// `gene_start`/`gene_end` are 1-based inclusive coordinates on the
/// reference sequence `seq_id`; `aa_coord` is the 1-based codon index
/// within the gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusRecord {
    pub aid: String,
    pub seq_id: String,
    pub gene_start: usize,
    pub gene_end: usize,
    pub aa_coord: usize,
    pub tgt_codon: String,
}

impl LocusRecord {
    /// Validates a raw row. `line` is only used for diagnostics.
    pub fn from_raw(raw: RawLocus, line: u64) -> Result<Self> {
        let gene_start = parse_coord(&raw.start, COL_START, line)?;
        let gene_end = parse_coord(&raw.end, COL_END, line)?;
        let aa_coord = parse_coord(&raw.mut_pos, COL_MUT_POS, line)?;

        if gene_start > gene_end {
            return Err(FlankError::InvalidSpan {
                aid: raw.aid,
                start: gene_start,
                end: gene_end,
            });
        }

        if raw.tgt_codon.len() != CODON_LEN {
            return Err(FlankError::InvalidCodon {
                aid: raw.aid,
                codon: raw.tgt_codon,
            });
        }

        Ok(LocusRecord {
            aid: raw.aid,
            seq_id: raw.contig,
            gene_start,
            gene_end,
            aa_coord,
            tgt_codon: raw.tgt_codon,
        })
    }

    /// Gene length in nucleotides.
    pub fn gene_len(&self) -> usize {
        self.gene_end - self.gene_start + 1
    }

    /// 0-based half-open codon offsets within the gene, `None` when
    /// `aa_coord` is 0 or the offsets overflow.
    pub fn codon_range(&self) -> Option<std::ops::Range<usize>> {
        let nt_start = self.aa_coord.checked_sub(1)?.checked_mul(CODON_LEN)?;
        Some(nt_start..nt_start.checked_add(CODON_LEN)?)
    }
}

impl fmt::Display for LocusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{}-{}, codon {} -> {})",
            self.aid, self.seq_id, self.gene_start, self.gene_end, self.aa_coord, self.tgt_codon
        )
    }
}

/// Parses a strictly positive 1-based coordinate.
fn parse_coord(value: &str, field: &'static str, line: u64) -> Result<usize> {
    let invalid = |reason: String| FlankError::InvalidField {
        line,
        field,
        value: value.to_string(),
        reason,
    };

    let coord = value
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid(e.to_string()))?;

    if coord == 0 {
        return Err(invalid("coordinates are 1-based".to_string()));
    }

    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start: &str, end: &str, mut_pos: &str, tgt_codon: &str) -> RawLocus {
        RawLocus {
            aid: "A1".to_string(),
            contig: "chr1".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            tgt_codon: tgt_codon.to_string(),
            mut_pos: mut_pos.to_string(),
        }
    }

    #[test]
    fn test_valid_row() {
        let locus = LocusRecord::from_raw(raw("1", "9", "2", "GGG"), 2).unwrap();

        assert_eq!(locus.seq_id, "chr1");
        assert_eq!(locus.gene_len(), 9);
        assert_eq!(locus.codon_range(), Some(3..6));
    }

    #[test]
    fn test_non_numeric_field() {
        let err = LocusRecord::from_raw(raw("1", "nine", "2", "GGG"), 4).unwrap_err();

        match err {
            FlankError::InvalidField { line, field, .. } => {
                assert_eq!(line, 4);
                assert_eq!(field, COL_END);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_coordinates_rejected() {
        assert!(LocusRecord::from_raw(raw("0", "9", "2", "GGG"), 2).is_err());
        assert!(LocusRecord::from_raw(raw("1", "9", "0", "GGG"), 2).is_err());
    }

    #[test]
    fn test_codon_range_does_not_wrap() {
        let mut locus = LocusRecord::from_raw(raw("1", "9", "2", "GGG"), 2).unwrap();

        locus.aa_coord = 6148914691236517207;
        assert_eq!(locus.codon_range(), None);

        locus.aa_coord = usize::MAX;
        assert_eq!(locus.codon_range(), None);

        locus.aa_coord = 0;
        assert_eq!(locus.codon_range(), None);
    }

    #[test]
    fn test_inverted_span_rejected() {
        let err = LocusRecord::from_raw(raw("10", "9", "1", "GGG"), 2).unwrap_err();
        assert!(matches!(err, FlankError::InvalidSpan { .. }));
    }

    #[test]
    fn test_codon_length_checked() {
        let err = LocusRecord::from_raw(raw("1", "9", "1", "GG"), 2).unwrap_err();
        assert!(matches!(err, FlankError::InvalidCodon { .. }));
        assert!(err.is_row_error());
    }
}
