//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! For every locus of a codon substitution table, this tool emits the gene with
//! its flanking margins twice (reference codon and target codon) to a FASTA file,
//! and writes a query table locating the mutated codon within both sequences.
//! References can be plain FASTA, gzipped FASTA or 2bit.
//!
//! # Usage
//!
//! ```bash
//! Usage: codonflank [OPTIONS] --fasta <FASTA> --updated-data <UPDATED_DATA>
//!
//! Options:
//!   -f, --fasta <FASTA>                  Path to reference sequence file (.fa, .fa.gz, or .2bit)
//!   -u, --updated-data <UPDATED_DATA>    TSV with columns: aid, gene, contig, start, end, strand, flipped, src_codon, tgt_codon, mut_pos
//!   -l, --left-margin <LEFT_MARGIN>      Bases kept upstream of each gene [default: 2000]
//!   -r, --right-margin <RIGHT_MARGIN>    Bases kept downstream of each gene [default: 1000]
//!   -o, --output-fasta <OUTPUT_FASTA>    If set: write both codon variants of every locus to this FASTA
//!   -q, --query-table <QUERY_TABLE>      If set: write seq_id/start/end query windows to this table
//!   -I, --ignore-errors                  Skip invalid rows with a warning instead of aborting the run
//!   -L, --level <LEVEL>                  Logging verbosity level [default: info]
//!   -h, --help                           Print help
//!   -V, --version                        Print version
//! ```

pub mod cli;
pub mod consts;
pub mod core;
pub mod error;
pub mod locus;
pub mod reference;
pub mod sink;
pub mod variant;

pub use cli::Args;
pub use crate::core::{BatchSummary, codonflank, process_table};
pub use error::{FlankError, Result};
pub use locus::LocusRecord;
pub use reference::{Genome, get_sequences};
pub use sink::Sinks;
pub use variant::{Margins, QueryWindow, Variant, VariantPair, build_variants};
