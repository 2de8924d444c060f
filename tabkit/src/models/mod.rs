//! Domain models shared by both transformations.
//!
//! - [`Cell`] - A nullable scalar keeping its original text
//! - [`CellKind`] - Type inferred for a column of cells
//! - [`Table`] - Ordered columns with row-major cells
//! - [`Axis`] - Direction of concatenation
//! - [`Join`] - How labels on the other axis are combined
//! - [`MetadataEntry`] - One `attribute, value, unit` row

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

// =============================================================================
// Cells
// =============================================================================

/// Type inferred for a column when it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl CellKind {
    /// Infer the narrowest kind that fits every non-null value.
    ///
    /// A column with no values at all is `Text`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen = false;
        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;

        for raw in values {
            seen = true;
            let v = raw.trim();
            all_int = all_int && v.parse::<i64>().is_ok();
            all_float = all_float && is_exact_float(v);
            all_bool = all_bool && parse_bool(v).is_some();
            if !(all_int || all_float || all_bool) {
                return CellKind::Text;
            }
        }

        match (seen, all_int, all_float, all_bool) {
            (false, ..) => CellKind::Text,
            (true, true, _, _) => CellKind::Integer,
            (true, false, true, _) => CellKind::Float,
            (true, false, false, true) => CellKind::Boolean,
            _ => CellKind::Text,
        }
    }
}

/// A finite float whose JSON rendering keeps every digit of an integral
/// token. Integers too wide for `f64` stay text.
fn is_exact_float(v: &str) -> bool {
    let Ok(f) = v.parse::<f64>() else {
        return false;
    };
    if !f.is_finite() {
        return false;
    }
    let digits = v.strip_prefix(['-', '+']).unwrap_or(v);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    v.parse::<i128>().map(|n| f as i128 == n).unwrap_or(false)
}

fn parse_bool(v: &str) -> Option<bool> {
    match v {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// A single table cell.
///
/// Non-null cells keep the text they were read from so delimited output
/// reproduces the input exactly; the kind only affects JSON rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Value { text: String, kind: CellKind },
}

impl Cell {
    /// A text cell.
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Value {
            text: text.into(),
            kind: CellKind::Text,
        }
    }

    /// A cell of an already-inferred kind.
    pub fn typed(text: impl Into<String>, kind: CellKind) -> Self {
        Cell::Value {
            text: text.into(),
            kind,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Original text, `None` for null cells.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Null => None,
            Cell::Value { text, .. } => Some(text),
        }
    }

    /// Field text for delimited output. Null writes as an empty field.
    pub fn to_field(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// JSON value for record output.
    ///
    /// Falls back to a JSON string whenever the text does not fit its kind.
    pub fn to_json(&self) -> Value {
        let (text, kind) = match self {
            Cell::Null => return Value::Null,
            Cell::Value { text, kind } => (text, *kind),
        };
        let trimmed = text.trim();
        match kind {
            CellKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(text.clone())),
            CellKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(text.clone())),
            CellKind::Boolean => parse_bool(trimmed)
                .map(Value::Bool)
                .unwrap_or_else(|| Value::String(text.clone())),
            CellKind::Text => Value::String(text.clone()),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// An ordered set of columns with row-major cells.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows, padding short rows with nulls and
    /// dropping cells beyond the last column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, normalized to the table width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the first column named `column`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// First column name that appears more than once, if any.
    pub fn duplicate_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .enumerate()
            .find(|&(i, name)| self.columns[..i].contains(name))
            .map(|(_, name)| name.as_str())
    }
}

// =============================================================================
// Concatenation Options
// =============================================================================

/// Direction along which tables are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Stack vertically, aligning by column name.
    #[default]
    Rows,
    /// Place side by side, aligning by row position.
    Columns,
}

impl Axis {
    /// Parse an axis name, accepting the usual aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "rows" | "row" | "index" | "0" => Some(Self::Rows),
            "columns" | "column" | "1" => Some(Self::Columns),
            _ => None,
        }
    }
}

impl FromStr for Axis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::UnknownAxis(s.to_string()))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Columns => write!(f, "columns"),
        }
    }
}

/// How labels on the non-concatenation axis are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    /// Union; missing cells become null.
    #[default]
    Outer,
    /// Intersection; labels absent from any input are dropped.
    Inner,
}

impl Join {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "outer" => Some(Self::Outer),
            "inner" => Some(Self::Inner),
            _ => None,
        }
    }
}

impl FromStr for Join {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::UnknownJoin(s.to_string()))
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Join::Outer => write!(f, "outer"),
            Join::Inner => write!(f, "inner"),
        }
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// One row of a long-format metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub attribute: String,
    pub value: String,
    /// Read for completeness; aggregation ignores it.
    pub unit: String,
}

impl MetadataEntry {
    pub fn new(
        attribute: impl Into<String>,
        value: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
