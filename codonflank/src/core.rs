use crate::{
    cli::Args,
    consts::REQUIRED_COLUMNS,
    error::{FlankError, Result},
    locus::{LocusRecord, RawLocus},
    reference::{Genome, get_sequences},
    sink::Sinks,
    variant::{Margins, build_variants},
};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};

use std::{
    fmt,
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

/// Counters reported at the end of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub emitted: usize,
    pub skipped_missing_reference: usize,
    pub skipped_invalid: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={}, emitted={}, skipped_missing_reference={}, skipped_invalid={}",
            self.rows, self.emitted, self.skipped_missing_reference, self.skipped_invalid
        )
    }
}

/// What happened to a single table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    Emitted,
    MissingReference,
}

/// Main processing function: loads the reference, opens the sinks and runs
/// every row of the updated data table through the variant builder.
pub fn codonflank(args: Args) -> Result<BatchSummary> {
    let Args {
        fasta,
        updated_data,
        left_margin,
        right_margin,
        output_fasta,
        query_table,
        ignore_errors,
        ..
    } = args;

    let genome = get_sequences(&fasta)?;

    if !updated_data.is_file() {
        return Err(FlankError::TableNotFound(updated_data));
    }

    let table = File::open(&updated_data).map_err(|e| FlankError::io(&updated_data, e))?;
    let mut sinks = Sinks::create(output_fasta.as_deref(), query_table.as_deref())?;

    if sinks.is_dry_run() {
        info!("No --output-fasta or --query-table given, only validating rows");
    }

    let margins = Margins {
        left: left_margin,
        right: right_margin,
    };

    let summary = process_table(
        BufReader::new(table),
        &updated_data,
        &genome,
        margins,
        ignore_errors,
        &mut sinks,
    )?;
    sinks.flush()?;

    info!("Finished: {}", summary);

    Ok(summary)
}

/// Processes every row of a tab-separated locus table in order.
///
/// Rows whose contig is absent from `genome` are skipped with a warning.
/// Any other row error aborts the batch unless `ignore_errors` is set, in
/// which case the row is skipped. Records already appended to `sinks` stay
/// there when the batch aborts.
pub fn process_table<R: Read, W: Write>(
    table: R,
    path: &Path,
    genome: &Genome,
    margins: Margins,
    ignore_errors: bool,
    sinks: &mut Sinks<W>,
) -> Result<BatchSummary> {
    info!("Processing loci from file {}", path.display());

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(table);

    let headers = reader
        .headers()
        .map_err(|source| FlankError::Table {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    check_columns(&headers, path)?;

    let mut summary = BatchSummary::default();
    for result in reader.records() {
        summary.rows += 1;

        let outcome = result
            .map_err(|e| row_read_error(e, path))
            .and_then(|record| parse_row(&record, &headers))
            .and_then(|locus| emit_locus(&locus, genome, margins, sinks));

        match outcome {
            Ok(RowOutcome::Emitted) => summary.emitted += 1,
            Ok(RowOutcome::MissingReference) => summary.skipped_missing_reference += 1,
            Err(e) if ignore_errors && e.is_row_error() => {
                warn!("WARN: skipping row: {}", e);
                summary.skipped_invalid += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

fn check_columns(headers: &StringRecord, path: &Path) -> Result<()> {
    match REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        Some(&column) => Err(FlankError::MissingColumn {
            path: path.to_path_buf(),
            column,
        }),
        None => Ok(()),
    }
}

/// I/O failures abort the run; anything else is scoped to the row.
fn row_read_error(e: csv::Error, path: &Path) -> FlankError {
    if e.is_io_error() {
        return FlankError::Table {
            path: path.to_path_buf(),
            source: e,
        };
    }

    FlankError::MalformedRow {
        line: e.position().map_or(0, |p| p.line()),
        message: e.to_string(),
    }
}

fn parse_row(record: &StringRecord, headers: &StringRecord) -> Result<LocusRecord> {
    let line = record.position().map_or(0, |p| p.line());
    let raw: RawLocus = record
        .deserialize(Some(headers))
        .map_err(|e| FlankError::MalformedRow {
            line,
            message: e.to_string(),
        })?;

    LocusRecord::from_raw(raw, line)
}

/// Resolves the locus contig and appends both codon variants to `sinks`.
fn emit_locus<W: Write>(
    locus: &LocusRecord,
    genome: &Genome,
    margins: Margins,
    sinks: &mut Sinks<W>,
) -> Result<RowOutcome> {
    let Some(contig) = genome.get(&locus.seq_id) else {
        warn!(
            "WARN: seq id {} not found in reference; skipping {}",
            locus.seq_id, locus.aid
        );
        return Ok(RowOutcome::MissingReference);
    };

    let pair = build_variants(contig, locus, margins)?;
    debug!(
        "{}: {} -> {}, window {}-{}",
        locus,
        String::from_utf8_lossy(&pair.original_codon),
        locus.tgt_codon,
        pair.window.start,
        pair.window.end
    );

    sinks.append(&pair)?;

    Ok(RowOutcome::Emitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    const HEADER: &str = "aid\tgene\tcontig\tstart\tend\tstrand\tflipped\tsrc_codon\ttgt_codon\tmut_pos\n";

    fn genome() -> Genome {
        let mut genome = Genome::new();
        genome.insert("chr1".to_string(), b"CCCATGAAATTTGGG".to_vec());
        genome
    }

    fn run(table: &str, ignore_errors: bool) -> (Result<BatchSummary>, String, String) {
        let mut sinks = Sinks::from_writers(
            Some((PathBuf::from("out.fa"), Vec::new())),
            Some((PathBuf::from("query.tsv"), Vec::new())),
        )
        .unwrap();

        let summary = process_table(
            table.as_bytes(),
            Path::new("data.tsv"),
            &genome(),
            Margins { left: 2, right: 2 },
            ignore_errors,
            &mut sinks,
        );

        let (fasta, query) = sinks.into_inner().unwrap();
        (
            summary,
            String::from_utf8(fasta.unwrap()).unwrap(),
            String::from_utf8(query.unwrap()).unwrap(),
        )
    }

    #[test]
    fn test_single_row() {
        let table = format!("{HEADER}A1\tg\tchr1\t4\t12\t+\tF\tAAA\tGGG\t2\n");
        let (summary, fasta, query) = run(&table, false);

        assert_eq!(summary.unwrap().emitted, 1);
        assert_eq!(fasta, ">a1_AAA\nCCATGAAATTTGG\n>a1_GGG\nCCATGGGGTTTGG\n");
        assert_eq!(query, "seq_id\tstart\tend\na1_AAA\t7\t13\na1_GGG\t7\t13\n");
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let table = "aid\tcontig\tstart\tend\ttgt_codon\nA1\tchr1\t4\t12\tGGG\n";
        let (summary, fasta, _) = run(table, true);

        assert!(matches!(
            summary,
            Err(FlankError::MissingColumn {
                column: "mut_pos",
                ..
            })
        ));
        assert!(fasta.is_empty());
    }

    #[test]
    fn test_ignore_errors_skips_bad_rows() {
        let table = format!(
            "{HEADER}A1\tg\tchr1\t4\tx\t+\tF\tAAA\tGGG\t2\nA2\tg\tchr1\t4\t12\t+\tF\tAAA\tGGG\t9\nA3\tg\tchr1\t4\t12\t+\tF\tTTT\tCCC\t3\n"
        );
        let (summary, fasta, _) = run(&table, true);
        let summary = summary.unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.skipped_invalid, 2);
        assert_eq!(summary.emitted, 1);
        assert!(fasta.starts_with(">a3_TTT\n"));
    }

    #[test]
    fn test_malformed_row_is_row_error() {
        let table = format!("{HEADER}A1\tg\tchr1\t4\n");
        let (summary, _, _) = run(&table, false);

        let err = summary.unwrap_err();
        assert!(matches!(err, FlankError::MalformedRow { .. }));
        assert!(err.is_row_error());
    }
}
