//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025

/// Nucleotides in a codon
pub const CODON_LEN: usize = 3;

/// Default upstream context kept around each gene
pub const DEFAULT_LEFT_MARGIN: usize = 2000;

/// Default downstream context kept around each gene
pub const DEFAULT_RIGHT_MARGIN: usize = 1000;

/// Query windows span up to QUERY_SPAN + 1 nt starting at the codon middle base
pub const QUERY_SPAN: usize = 200;

pub const QUERY_TABLE_HEADER: &[u8] = b"seq_id\tstart\tend\n";

// INFO: columns consumed from the updated data TSV, others are ignored
pub const COL_AID: &str = "aid";
pub const COL_CONTIG: &str = "contig";
pub const COL_START: &str = "start";
pub const COL_END: &str = "end";
pub const COL_TGT_CODON: &str = "tgt_codon";
pub const COL_MUT_POS: &str = "mut_pos";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_AID,
    COL_CONTIG,
    COL_START,
    COL_END,
    COL_TGT_CODON,
    COL_MUT_POS,
];
