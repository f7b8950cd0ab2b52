//! build wild-type/mutant codon variants with flanking context from fa/2bit
//! Alejandro Gonzales-Irribarren, 2025
//!
//! In-memory reference store keyed by sequence id.

use flate2::read::MultiGzDecoder;
use log::{info, warn};
use twobit::TwoBitFile;

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{FlankError, Result};

/// Reference sequences held for the whole run. Ids are unique; when a file
/// repeats an id the last record wins.
pub type Genome = HashMap<String, Vec<u8>>;

/// Loads reference sequences from a 2bit or FASTA (optionally gzipped) file.
pub fn get_sequences(sequence: &Path) -> Result<Genome> {
    info!("Reading sequences from file {}", sequence.display());

    if !sequence.is_file() {
        return Err(FlankError::Reference {
            path: sequence.to_path_buf(),
            message: "file not found".to_string(),
        });
    }

    match sequence.extension().and_then(|ext| ext.to_str()) {
        Some("2bit") => from_2bit(sequence),
        _ => from_fa(sequence),
    }
}

/// Loads reference sequences from a 2bit compressed format file.
fn from_2bit(twobit: &Path) -> Result<Genome> {
    let reference_error = |message: String| FlankError::Reference {
        path: twobit.to_path_buf(),
        message,
    };

    let mut genome =
        TwoBitFile::open_and_read(twobit).map_err(|e| reference_error(e.to_string()))?;

    let mut sequences = Genome::new();
    for chr in genome.chrom_names() {
        let seq = genome
            .read_sequence(&chr, ..)
            .map_err(|e| reference_error(format!("{}: {}", chr, e)))?
            .into_bytes();

        insert_record(&mut sequences, chr, seq);
    }

    info!(
        "Read {} sequences from file {}",
        sequences.len(),
        twobit.display()
    );

    Ok(sequences)
}

/// Loads reference sequences from a FASTA format file (optionally gzipped).
///
/// Record ids are the first whitespace-delimited token of each header line;
/// sequence lines are concatenated verbatim.
pub fn from_fa<F: AsRef<Path>>(f: F) -> Result<Genome> {
    let path = f.as_ref();
    let file = File::open(path).map_err(|e| FlankError::io(path, e))?;

    let reader: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    let acc = read_fasta(reader).map_err(|e| FlankError::io(path, e))?;
    if acc.is_empty() {
        return Err(FlankError::Reference {
            path: path.to_path_buf(),
            message: "no FASTA records found".to_string(),
        });
    }

    info!("Read {} sequences from file {}", acc.len(), path.display());

    Ok(acc)
}

/// Parses FASTA records from any buffered reader.
pub fn read_fasta<R: BufRead>(mut reader: R) -> std::io::Result<Genome> {
    let mut acc = Genome::new();
    let mut line = Vec::new();
    let mut header: Option<String> = None;
    let mut seq = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if line.ends_with(b"\n") {
            line.pop();
        }

        if line.ends_with(b"\r") {
            line.pop();
        }

        if line.is_empty() {
            continue;
        }

        if line[0] == b'>' {
            if let Some(prev_header) = header.replace(record_id(&line[1..])) {
                insert_record(&mut acc, prev_header, std::mem::take(&mut seq));
            }
        } else if header.is_some() {
            seq.extend_from_slice(line.trim_ascii_end());
        }
    }

    if let Some(last_header) = header {
        insert_record(&mut acc, last_header, seq);
    }

    Ok(acc)
}

fn record_id(header: &[u8]) -> String {
    let header = String::from_utf8_lossy(header);
    header.split_whitespace().next().unwrap_or_default().to_string()
}

fn insert_record(acc: &mut Genome, id: String, seq: Vec<u8>) {
    if acc.contains_key(&id) {
        warn!("WARN: duplicate sequence id {}, keeping the last record", id);
    }

    acc.insert(id, seq);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fasta_multiline_and_description() {
        let fasta = b">chr1 some description\nACGT\nAC\r\n\n>chr2\nTTTT\n";
        let genome = read_fasta(&fasta[..]).unwrap();

        assert_eq!(genome.len(), 2);
        assert_eq!(genome["chr1"], b"ACGTAC");
        assert_eq!(genome["chr2"], b"TTTT");
    }

    #[test]
    fn test_read_fasta_drops_trailing_whitespace() {
        let fasta = b">c\nACGT  \nAC\t\n";
        let genome = read_fasta(&fasta[..]).unwrap();

        assert_eq!(genome["c"], b"ACGTAC");
    }

    #[test]
    fn test_read_fasta_last_wins() {
        let fasta = b">dup\nAAAA\n>dup\nCCCC\n";
        let genome = read_fasta(&fasta[..]).unwrap();

        assert_eq!(genome.len(), 1);
        assert_eq!(genome["dup"], b"CCCC");
    }

    #[test]
    fn test_read_fasta_keeps_case() {
        let fasta = b">chr1\nacgtNN\n";
        let genome = read_fasta(&fasta[..]).unwrap();

        assert_eq!(genome["chr1"], b"acgtNN");
    }
}
