//! High-level entry points combining parse, transform, render and write.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabkit::pipeline::{run_concat, ConcatOptions};
//! use std::path::PathBuf;
//!
//! let inputs = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
//! let report = run_concat(&inputs, &ConcatOptions::default())?;
//! println!("Wrote {} rows", report.rows);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, InputError, Result};
use crate::logs::{log_info, log_success};
use crate::models::{Axis, Join, Table};
use crate::output::{
    render_csv, render_json_indexed, render_json_lines, render_json_records, write_files,
    OutputFile,
};
use crate::parser::{parse_metadata_file, parse_table_file};
use crate::transform::{aggregate, concat, MetadataRecord};

/// Base name of the aggregator outputs.
pub const METADATA_PREFIX: &str = "metadata";

// =============================================================================
// Options
// =============================================================================

/// Options for concatenating tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcatOptions {
    /// Axis to concatenate along
    pub axis: Axis,

    /// How labels on the other axis are combined
    pub join: Join,

    /// Output files are `<prefix>.csv` and `<prefix>.json`
    pub prefix: String,

    /// Input field delimiter
    pub delimiter: u8,

    /// Write JSON as one record per line instead of an array
    pub json_lines: bool,

    /// Directory the outputs are written to
    pub outdir: PathBuf,
}

impl Default for ConcatOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Rows,
            join: Join::Outer,
            prefix: "output".to_string(),
            delimiter: b',',
            json_lines: false,
            outdir: PathBuf::from("."),
        }
    }
}

/// Options for aggregating metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Separator between values of a repeated attribute
    pub separator: String,

    /// Name of the index column when `id` is set
    pub index_name: String,

    /// Label for the output row
    pub id: Option<String>,

    /// Input field delimiter
    pub delimiter: u8,

    /// Directory the outputs are written to
    pub outdir: PathBuf,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            index_name: "id".to_string(),
            id: None,
            delimiter: b',',
            outdir: PathBuf::from("."),
        }
    }
}

impl AggregateOptions {
    /// The row identifier, if any. An empty identifier counts as absent.
    pub fn row_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Check option combinations that cannot be rendered.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.row_id().is_some() && self.index_name.is_empty() {
            return Err(ConfigError::EmptyIndexName);
        }
        Ok(())
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Summary of a concatenation run
#[derive(Debug, Clone, Serialize)]
pub struct ConcatReport {
    pub inputs: usize,
    pub rows: usize,
    pub columns: usize,
    pub outputs: Vec<PathBuf>,
}

/// Summary of an aggregation run
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub entries: usize,
    pub attributes: usize,
    pub outputs: Vec<PathBuf>,
}

fn output_paths(outdir: &Path, prefix: &str) -> (PathBuf, PathBuf) {
    (
        outdir.join(format!("{}.csv", prefix)),
        outdir.join(format!("{}.json", prefix)),
    )
}

// =============================================================================
// Concatenation
// =============================================================================

/// Read and concatenate `inputs` in order.
pub fn concat_files(inputs: &[PathBuf], options: &ConcatOptions) -> Result<Table> {
    if inputs.is_empty() {
        return Err(InputError::NoInputs.into());
    }

    let mut tables = Vec::with_capacity(inputs.len());
    for path in inputs {
        log_info(format!("Reading {}", path.display()));
        let parsed = parse_table_file(path, options.delimiter)?;
        debug!(
            encoding = %parsed.encoding,
            rows = parsed.table.num_rows(),
            columns = parsed.table.num_columns(),
            "parsed input"
        );
        tables.push(parsed.table);
    }

    let table = concat(&tables, options.axis, options.join);
    log_success(format!(
        "Concatenated {} tables along {} ({} join): {} rows x {} columns",
        tables.len(),
        options.axis,
        options.join,
        table.num_rows(),
        table.num_columns()
    ));
    Ok(table)
}

/// Render a concatenated table into its CSV and JSON outputs.
pub fn render_concat(table: &Table, options: &ConcatOptions) -> Result<Vec<OutputFile>> {
    let (csv_path, json_path) = output_paths(&options.outdir, &options.prefix);
    let json = if options.json_lines {
        render_json_lines(table)?
    } else {
        render_json_records(table)?
    };
    Ok(vec![
        OutputFile::new(csv_path, render_csv(table)?),
        OutputFile::new(json_path, json),
    ])
}

/// Concatenate `inputs` and write `<prefix>.csv` and `<prefix>.json`.
///
/// Nothing is written unless every input parses and both outputs render.
pub fn run_concat(inputs: &[PathBuf], options: &ConcatOptions) -> Result<ConcatReport> {
    let table = concat_files(inputs, options)?;
    let files = render_concat(&table, options)?;
    write_files(&files)?;

    let outputs: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();
    for path in &outputs {
        log_success(format!("Wrote {}", path.display()));
    }

    Ok(ConcatReport {
        inputs: inputs.len(),
        rows: table.num_rows(),
        columns: table.num_columns(),
        outputs,
    })
}

// =============================================================================
// Metadata aggregation
// =============================================================================

/// Read a metadata file and aggregate it into one record.
///
/// Returns the record and the number of entries read.
pub fn aggregate_file(
    input: &Path,
    options: &AggregateOptions,
) -> Result<(MetadataRecord, usize)> {
    options.validate()?;

    log_info(format!("Reading {}", input.display()));
    let entries = parse_metadata_file(input, options.delimiter)?;
    let record = aggregate(&entries, &options.separator);
    log_success(format!(
        "Aggregated {} entries into {} attributes",
        entries.len(),
        record.len()
    ));
    Ok((record, entries.len()))
}

/// Render an aggregated record into `metadata.csv` and `metadata.json`.
///
/// With an identifier the CSV carries the index column and the JSON is
/// keyed by the identifier; without one the CSV has no index column and
/// the JSON is a one-element array.
pub fn render_aggregate(
    record: &MetadataRecord,
    options: &AggregateOptions,
) -> Result<Vec<OutputFile>> {
    options.validate()?;

    let (csv_path, json_path) = output_paths(&options.outdir, METADATA_PREFIX);
    let (csv, json) = match options.row_id() {
        Some(id) => {
            let table = record.to_table(Some((options.index_name.as_str(), id)));
            (render_csv(&table)?, render_json_indexed(&table, 0)?)
        }
        None => {
            let table = record.to_table(None);
            (render_csv(&table)?, render_json_records(&table)?)
        }
    };
    Ok(vec![
        OutputFile::new(csv_path, csv),
        OutputFile::new(json_path, json),
    ])
}

/// Aggregate `input` and write `metadata.csv` and `metadata.json`.
pub fn run_aggregate(input: &Path, options: &AggregateOptions) -> Result<AggregateReport> {
    let (record, entries) = aggregate_file(input, options)?;
    let files = render_aggregate(&record, options)?;
    write_files(&files)?;

    let outputs: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();
    for path in &outputs {
        log_success(format!("Wrote {}", path.display()));
    }

    Ok(AggregateReport {
        entries,
        attributes: record.len(),
        outputs,
    })
}
