//! Command-line arguments for the two tools.
//!
//! Option values arrive as strings and are converted here so that an
//! unknown axis or join surfaces as a [`ConfigError`] rather than a
//! usage error.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::logs;
use crate::pipeline::{
    run_aggregate, run_concat, AggregateOptions, AggregateReport, ConcatOptions, ConcatReport,
};

/// Parse a delimiter given as one ASCII character or `\t`.
pub fn parse_delimiter(raw: &str) -> std::result::Result<u8, ConfigError> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        _ if raw.len() == 1 && raw.is_ascii() => Ok(raw.as_bytes()[0]),
        _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
    }
}

/// Shared logging flags.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Verbosity {
    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Verbosity {
    pub fn init_logging(&self) {
        logs::init(self.verbose, self.quiet);
    }
}

// =============================================================================
// csv-concat
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "csv-concat")]
#[command(
    about = "Concatenates .csv files and saves the result in .csv and .json format",
    long_about = None
)]
pub struct ConcatArgs {
    /// Paths to the .csv files to concatenate
    #[arg(long, value_name = "FILE", num_args = 1.., required = true)]
    pub input: Vec<PathBuf>,

    /// Axis to concatenate along ('rows' or 'columns')
    #[arg(long, default_value = "rows")]
    pub axis: String,

    /// How to combine labels on the other axis ('inner' or 'outer')
    #[arg(long, default_value = "outer")]
    pub join: String,

    /// Prefix for the output files
    #[arg(long, default_value = "output")]
    pub prefix: String,

    /// Input field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: String,

    /// Write the .json output as one record per line
    #[arg(long)]
    pub json_lines: bool,

    /// Directory for the output files
    #[arg(long, default_value = ".")]
    pub outdir: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl ConcatArgs {
    /// Validate option values into pipeline options.
    pub fn to_options(&self) -> std::result::Result<ConcatOptions, ConfigError> {
        Ok(ConcatOptions {
            axis: self.axis.parse()?,
            join: self.join.parse()?,
            prefix: self.prefix.clone(),
            delimiter: parse_delimiter(&self.delimiter)?,
            json_lines: self.json_lines,
            outdir: self.outdir.clone(),
        })
    }

    pub fn run(&self) -> Result<ConcatReport> {
        let options = self.to_options()?;
        run_concat(&self.input, &options)
    }
}

// =============================================================================
// aggregate-metadata
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "aggregate-metadata")]
#[command(
    about = "Aggregates metadata for duplicated attributes and saves it in .csv and .json format",
    long_about = None
)]
pub struct AggregateArgs {
    /// Path to the headerless attribute,value,unit metadata file
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Separator for values of duplicated attributes
    #[arg(long = "dup-sep", default_value = ",")]
    pub dup_sep: String,

    /// Name of the index column in the outputs
    #[arg(long = "index_name", default_value = "id")]
    pub index_name: String,

    /// Identifier for the output row; without it no index column is written
    #[arg(long)]
    pub id: Option<String>,

    /// Input field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: String,

    /// Directory for the output files
    #[arg(long, default_value = ".")]
    pub outdir: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl AggregateArgs {
    pub fn to_options(&self) -> std::result::Result<AggregateOptions, ConfigError> {
        let options = AggregateOptions {
            separator: self.dup_sep.clone(),
            index_name: self.index_name.clone(),
            id: self.id.clone(),
            delimiter: parse_delimiter(&self.delimiter)?,
            outdir: self.outdir.clone(),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn run(&self) -> Result<AggregateReport> {
        let options = self.to_options()?;
        run_aggregate(&self.input, &options)
    }
}
