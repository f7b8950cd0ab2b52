//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Reads a reference (fa, fa.gz or 2bit) and a table of codon substitutions,
//! and writes both codon variants of every locus with their flanking context

use clap::{ArgAction, Parser};
use log::Level;

use std::{fmt, path::PathBuf};

use crate::consts::{DEFAULT_LEFT_MARGIN, DEFAULT_RIGHT_MARGIN};

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
pub struct Args {
    /// Path to reference sequence file (.fa, .fa.gz, or .2bit)
    #[arg(short = 'f', long)]
    pub fasta: PathBuf,

    /// TSV with columns: aid, gene, contig, start, end, strand, flipped, src_codon, tgt_codon, mut_pos
    #[arg(short = 'u', long = "updated-data")]
    pub updated_data: PathBuf,

    /// Bases kept upstream of each gene
    #[arg(short = 'l', long = "left-margin", default_value_t = DEFAULT_LEFT_MARGIN)]
    pub left_margin: usize,

    /// Bases kept downstream of each gene
    #[arg(short = 'r', long = "right-margin", default_value_t = DEFAULT_RIGHT_MARGIN)]
    pub right_margin: usize,

    /// If set: write both codon variants of every locus to this FASTA
    #[arg(short = 'o', long = "output-fasta")]
    pub output_fasta: Option<PathBuf>,

    /// If set: write seq_id/start/end query windows to this table
    #[arg(short = 'q', long = "query-table")]
    pub query_table: Option<PathBuf>,

    /// Skip invalid rows with a warning instead of aborting the run
    #[arg(short = 'I', long, default_value = "false", action = ArgAction::SetTrue)]
    pub ignore_errors: bool,

    /// Logging verbosity level
    #[arg(short = 'L', long, default_value = "info")]
    pub level: Level,
}

/// Formats the Args struct as a comma-separated string of key=value pairs.
///
/// # Example
///
/// ```rust,ignore
/// use codonflank::Args;
/// let args = Args::parse();
/// println!("{}", args);
/// ```
impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fasta={}, updated_data={}, left_margin={}, right_margin={}, output_fasta={}, query_table={}, ignore_errors={}, level={}",
            self.fasta.display(),
            self.updated_data.display(),
            self.left_margin,
            self.right_margin,
            display_opt(&self.output_fasta),
            display_opt(&self.query_table),
            self.ignore_errors,
            self.level,
        )
    }
}

fn display_opt(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}
