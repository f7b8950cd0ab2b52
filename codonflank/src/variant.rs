//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Variant construction: a gene with its flanking margins is emitted twice,
//! once carrying the reference codon and once carrying the target codon.
//! Both copies share the same query window, anchored at the middle base of
//! the substituted codon.

use std::ops::Range;

use crate::{
    consts::QUERY_SPAN,
    error::{FlankError, Result},
    locus::LocusRecord,
};

/// Flanking context requested around every gene, in nucleotides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: usize,
    pub right: usize,
}

/// 1-based query coordinates of the mutation within a variant sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: usize,
    pub end: usize,
}

impl QueryWindow {
    /// Window anchored at the codon middle base, clipped at `total_len`.
    pub fn anchored(left_len: usize, nt_start: usize, total_len: usize) -> Self {
        // INFO: 0-based middle base is nt_start + 1, +1 again for 1-based
        let start = left_len + nt_start + 2;
        let end = (start + QUERY_SPAN).min(total_len);

        QueryWindow { start, end }
    }
}

/// One emitted sequence: `{aid}_{codon}` and its flanked gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Both codon variants of a locus. `variants[0]` always carries the
/// reference codon and `variants[1]` the target codon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPair {
    pub original_codon: Vec<u8>,
    pub variants: [Variant; 2],
    pub window: QueryWindow,
}

/// Builds the reference and target codon variants of `locus` on `contig`.
///
/// Fails when the gene runs past the contig end or when the codon does not
/// fit inside the gene.
pub fn build_variants(
    contig: &[u8],
    locus: &LocusRecord,
    margins: Margins,
) -> Result<VariantPair> {
    let gene = gene_slice(contig, locus)?;
    let codon = locus
        .codon_range()
        .filter(|codon| codon.end <= gene.len())
        .ok_or_else(|| FlankError::PositionBeyondSequence {
            aid: locus.aid.clone(),
            aa_coord: locus.aa_coord,
            gene_len: locus.gene_len(),
        })?;

    let left = left_margin(contig, locus.gene_start, margins.left);
    let right = right_margin(contig, locus.gene_end, margins.right);

    let original_codon = gene[codon.clone()].to_vec();
    let aid = locus.aid.to_lowercase();

    let variants = [original_codon.as_slice(), locus.tgt_codon.as_bytes()].map(|sub| {
        Variant {
            id: format!("{}_{}", aid, String::from_utf8_lossy(sub)),
            seq: splice(left, gene, codon.clone(), sub, right),
        }
    });

    let total_len = left.len() + gene.len() + right.len();
    let window = QueryWindow::anchored(left.len(), codon.start, total_len);

    Ok(VariantPair {
        original_codon,
        variants,
        window,
    })
}

/// Gene sequence spanning the 1-based inclusive `[gene_start, gene_end]`.
fn gene_slice<'a>(contig: &'a [u8], locus: &LocusRecord) -> Result<&'a [u8]> {
    if locus.gene_start == 0 || locus.gene_start > locus.gene_end {
        return Err(FlankError::InvalidSpan {
            aid: locus.aid.clone(),
            start: locus.gene_start,
            end: locus.gene_end,
        });
    }

    contig
        .get(locus.gene_start - 1..locus.gene_end)
        .ok_or_else(|| FlankError::GeneBeyondContig {
            aid: locus.aid.clone(),
            end: locus.gene_end,
            contig_len: contig.len(),
        })
}

/// Up to `nts` bases immediately upstream of the 1-based `gene_start`,
/// clipped at the contig start.
pub fn left_margin(contig: &[u8], gene_start: usize, nts: usize) -> &[u8] {
    let end = gene_start.saturating_sub(1).min(contig.len());
    &contig[end.saturating_sub(nts)..end]
}

/// Up to `nts` bases immediately downstream of the 1-based `gene_end`,
/// clipped at the contig end.
pub fn right_margin(contig: &[u8], gene_end: usize, nts: usize) -> &[u8] {
    let start = gene_end.min(contig.len());
    &contig[start..start.saturating_add(nts).min(contig.len())]
}

/// left + gene[..codon.start] + sub + gene[codon.end..] + right
fn splice(left: &[u8], gene: &[u8], codon: Range<usize>, sub: &[u8], right: &[u8]) -> Vec<u8> {
    let mut seq = Vec::with_capacity(left.len() + gene.len() + right.len());

    seq.extend_from_slice(left);
    seq.extend_from_slice(&gene[..codon.start]);
    seq.extend_from_slice(sub);
    seq.extend_from_slice(&gene[codon.end..]);
    seq.extend_from_slice(right);

    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_clip_at_contig_edges() {
        let contig = b"AAAACCCCGGGG";

        assert_eq!(left_margin(contig, 5, 2), b"AA");
        assert_eq!(left_margin(contig, 5, 100), b"AAAA");
        assert_eq!(left_margin(contig, 1, 100), b"");
        assert_eq!(right_margin(contig, 8, 2), b"GG");
        assert_eq!(right_margin(contig, 8, 100), b"GGGG");
        assert_eq!(right_margin(contig, 12, 100), b"");
    }

    #[test]
    fn test_window_clipped_at_sequence_end() {
        let window = QueryWindow::anchored(3, 3, 15);
        assert_eq!(window, QueryWindow { start: 8, end: 15 });

        let window = QueryWindow::anchored(2000, 300, 10_000);
        assert_eq!(window.start, 2302);
        assert_eq!(window.end, 2502);
        assert_eq!(window.end - window.start + 1, 201);
    }

    #[test]
    fn test_huge_codon_index_is_rejected() {
        let locus = LocusRecord {
            aid: "A1".to_string(),
            seq_id: "chr1".to_string(),
            gene_start: 1,
            gene_end: 9,
            aa_coord: 1,
            tgt_codon: "GGG".to_string(),
        };

        for aa_coord in [6148914691236517207, 6148914691236517206, usize::MAX] {
            let locus = LocusRecord {
                aa_coord,
                ..locus.clone()
            };
            let err = build_variants(b"ATGAAATTTCCC", &locus, Margins { left: 0, right: 0 })
                .unwrap_err();

            assert!(matches!(
                err,
                FlankError::PositionBeyondSequence { gene_len: 9, .. }
            ));
        }
    }

    #[test]
    fn test_splice_replaces_codon_only() {
        let seq = splice(b"NN", b"ATGAAATTT", 3..6, b"GGG", b"CC");
        assert_eq!(seq, b"NNATGGGGTTTCC");
    }
}
