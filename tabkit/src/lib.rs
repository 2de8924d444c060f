//! # tabkit - Table concatenation and metadata aggregation
//!
//! Two pipeline steps for tabular data, each reading delimited files and
//! writing the result as both CSV and JSON:
//!
//! - `csv-concat` stacks several tables along rows or columns
//! - `aggregate-metadata` pivots `attribute, value, unit` rows into one
//!   record, joining the values of repeated attributes
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV files  │────▶│   Parser    │────▶│  Transform  │────▶│ CSV + JSON  │
//! │  (any enc)  │     │  (typed)    │     │ (pure, mem) │     │  (atomic)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabkit::{run_aggregate, AggregateOptions};
//! use std::path::Path;
//!
//! let options = AggregateOptions { id: Some("sample1".into()), ..Default::default() };
//! let report = run_aggregate(Path::new("irods.csv"), &options)?;
//! println!("{} attributes", report.attributes);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error hierarchy
//! - [`models`] - Table, cells, axis and join
//! - [`parser`] - Delimited readers with encoding detection
//! - [`transform`] - Concatenation and aggregation
//! - [`output`] - CSV/JSON rendering and atomic writes
//! - [`pipeline`] - End-to-end runs and their options
//! - [`cli`] - Command-line arguments
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Writing
pub mod output;

// Orchestration
pub mod cli;
pub mod logs;
pub mod pipeline;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ConfigError, Error, InputError, OutputError, Result};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Axis, Cell, CellKind, Join, MetadataEntry, Table};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    parse_metadata, parse_metadata_file, parse_table, parse_table_file, ParseResult,
};

// =============================================================================
// Re-exports - Transformations
// =============================================================================

pub use transform::{aggregate, concat, MetadataRecord};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{
    render_csv, render_json_indexed, render_json_lines, render_json_records, write_files,
    OutputFile,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    aggregate_file, concat_files, run_aggregate, run_concat, AggregateOptions, AggregateReport,
    ConcatOptions, ConcatReport,
};
