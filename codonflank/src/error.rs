//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Error taxonomy for a codonflank run.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlankError>;

/// Errors raised while loading references, parsing the locus table or
/// building variants.
///
/// Run-level failures (I/O, missing inputs, unreadable references) always
/// abort. Row-level failures abort by default and can be downgraded to
/// warn-and-skip with `--ignore-errors`, see [`FlankError::is_row_error`].
#[derive(Debug, Error)]
pub enum FlankError {
    #[error("ERROR: cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ERROR: updated data TSV not found: {}", .0.display())]
    TableNotFound(PathBuf),

    #[error("ERROR: cannot read table {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("ERROR: table {} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("ERROR: cannot read reference {}: {message}", .path.display())]
    Reference { path: PathBuf, message: String },

    #[error("ERROR: line {line}: malformed row: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("ERROR: line {line}: invalid {field} '{value}': {reason}")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("ERROR: {aid}: target codon '{codon}' is not 3 nucleotides long")]
    InvalidCodon { aid: String, codon: String },

    #[error("ERROR: {aid}: invalid gene span {start}..{end}")]
    InvalidSpan { aid: String, start: usize, end: usize },

    #[error("ERROR: {aid}: gene end {end} is beyond contig length {contig_len}")]
    GeneBeyondContig {
        aid: String,
        end: usize,
        contig_len: usize,
    },

    #[error("ERROR: {aid}: position {aa_coord} is beyond sequence length {gene_len}")]
    PositionBeyondSequence {
        aid: String,
        aa_coord: usize,
        gene_len: usize,
    },
}

impl FlankError {
    /// Returns true for errors scoped to a single table row.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            FlankError::MalformedRow { .. }
                | FlankError::InvalidField { .. }
                | FlankError::InvalidCodon { .. }
                | FlankError::InvalidSpan { .. }
                | FlankError::GeneBeyondContig { .. }
                | FlankError::PositionBeyondSequence { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlankError::Io {
            path: path.into(),
            source,
        }
    }
}
