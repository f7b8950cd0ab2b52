//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Output sinks for a batch: a FASTA of variant sequences and a query table
//! of `seq_id\tstart\tend` rows. Both are optional and truncated when opened.

use std::{
    fs::{File, create_dir_all},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    consts::QUERY_TABLE_HEADER,
    error::{FlankError, Result},
    variant::VariantPair,
};

/// A writer paired with the path reported in diagnostics.
struct Sink<W: Write> {
    path: PathBuf,
    writer: W,
}

impl<W: Write> Sink<W> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.writer
            .write_all(buf)
            .map_err(|e| FlankError::io(&self.path, e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| FlankError::io(&self.path, e))
    }
}

/// Append-only destinations for variant records.
pub struct Sinks<W: Write> {
    fasta: Option<Sink<W>>,
    table: Option<Sink<W>>,
}

impl Sinks<BufWriter<File>> {
    /// Creates (or truncates) the requested output files, creating parent
    /// directories as needed, and writes the query table header.
    pub fn create(fasta: Option<&Path>, table: Option<&Path>) -> Result<Self> {
        Sinks::from_writers(open_sink(fasta)?, open_sink(table)?)
    }
}

impl<W: Write> Sinks<W> {
    /// Wraps already opened writers; the table header is written here.
    pub fn from_writers(
        fasta: Option<(PathBuf, W)>,
        table: Option<(PathBuf, W)>,
    ) -> Result<Self> {
        let fasta = fasta.map(|(path, writer)| Sink { path, writer });
        let mut table = table.map(|(path, writer)| Sink { path, writer });

        if let Some(table) = &mut table {
            table.write_all(QUERY_TABLE_HEADER)?;
        }

        Ok(Sinks { fasta, table })
    }

    /// True when neither output was requested.
    pub fn is_dry_run(&self) -> bool {
        self.fasta.is_none() && self.table.is_none()
    }

    /// Appends both variants of a locus: two FASTA records and two query
    /// rows, in reference-then-target order.
    pub fn append(&mut self, pair: &VariantPair) -> Result<()> {
        if let Some(fasta) = &mut self.fasta {
            for variant in &pair.variants {
                fasta.write_all(b">")?;
                fasta.write_all(variant.id.as_bytes())?;
                fasta.write_all(b"\n")?;
                fasta.write_all(&variant.seq)?;
                fasta.write_all(b"\n")?;
            }
        }

        if let Some(table) = &mut self.table {
            for variant in &pair.variants {
                let row = format!(
                    "{}\t{}\t{}\n",
                    variant.id, pair.window.start, pair.window.end
                );
                table.write_all(row.as_bytes())?;
            }
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(fasta) = &mut self.fasta {
            fasta.flush()?;
        }

        if let Some(table) = &mut self.table {
            table.flush()?;
        }

        Ok(())
    }

    /// Flushes and hands back the underlying writers.
    pub fn into_inner(mut self) -> Result<(Option<W>, Option<W>)> {
        self.flush()?;
        Ok((
            self.fasta.map(|s| s.writer),
            self.table.map(|s| s.writer),
        ))
    }
}

fn open_sink(path: Option<&Path>) -> Result<Option<(PathBuf, BufWriter<File>)>> {
    path.map(|p| open_truncated(p).map(|writer| (p.to_path_buf(), writer)))
        .transpose()
}

fn open_truncated(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| FlankError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| FlankError::io(path, e))?;
    Ok(BufWriter::new(file))
}
