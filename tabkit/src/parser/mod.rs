//! Delimited-text readers with encoding detection.
//!
//! Two shapes are supported: headered tables (first line names the
//! columns) and headerless `attribute, value, unit` metadata files.
//! Content is decoded as UTF-8 when valid, otherwise the encoding is
//! guessed with chardet.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{InputError, InputResult};
use crate::models::{Cell, CellKind, MetadataEntry, Table};

/// Spellings read as a missing value.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Number of fields in a metadata row.
const METADATA_FIELDS: usize = 3;

/// Result of reading a table file.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
}

pub fn is_na(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always reported as `utf-8`; anything else goes
/// through chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using an encoding label. A leading BOM is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String, String> {
    let codec = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .ok_or_else(|| format!("unsupported encoding '{}'", encoding))?;
    let (text, _, _) = codec.decode(bytes);
    Ok(text.into_owned())
}

/// Rename repeated and empty header names.
///
/// Repeats become `name.1`, `name.2`, ...; empty names become
/// `Unnamed: <position>`.
pub fn dedupe_headers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut counters: HashMap<String, usize> = HashMap::new();

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        if names.contains(&candidate) {
            let counter = counters.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                candidate = format!("{}.{}", base, counter);
                if !names.contains(&candidate) {
                    break;
                }
            }
        }
        names.push(candidate);
    }

    names
}

fn reader(content: &str, delimiter: u8, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record[0].trim().is_empty()
}

/// Parse a headered delimited table.
///
/// Short rows are padded with nulls; rows longer than the header are
/// rejected. Column kinds are inferred from the non-null values.
pub fn parse_table(content: &str, delimiter: u8, origin: &Path) -> InputResult<Table> {
    let csv_err = |source| InputError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = reader(content, delimiter, true);
    let header = rdr.headers().map_err(csv_err)?.clone();
    if header.is_empty() || is_blank(&header) {
        return Err(InputError::Empty {
            path: origin.to_path_buf(),
        });
    }
    let columns = dedupe_headers(header.iter());

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        // a lone empty field is a blank line only when the header has more
        // than one column; in a single-column table it is a null cell
        if columns.len() > 1 && is_blank(&record) {
            continue;
        }
        if record.len() > columns.len() {
            return Err(InputError::Shape {
                path: origin.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: columns.len(),
                found: record.len(),
            });
        }
        raw_rows.push(
            record
                .iter()
                .map(|field| (!is_na(field)).then(|| field.to_string()))
                .collect(),
        );
    }

    let kinds: Vec<CellKind> = (0..columns.len())
        .map(|col| {
            CellKind::infer(
                raw_rows
                    .iter()
                    .filter_map(|row| row.get(col).and_then(|v| v.as_deref())),
            )
        })
        .collect();

    let rows: Vec<Vec<Cell>> = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(kinds.iter())
                .map(|(value, kind)| match value {
                    Some(text) => Cell::typed(text, *kind),
                    None => Cell::Null,
                })
                .collect::<Vec<Cell>>()
        })
        .collect();

    Ok(Table::from_rows(columns, rows))
}

/// Parse a headerless `attribute, value, unit` file.
///
/// Every non-blank row must have exactly three fields.
pub fn parse_metadata(
    content: &str,
    delimiter: u8,
    origin: &Path,
) -> InputResult<Vec<MetadataEntry>> {
    let mut rdr = reader(content, delimiter, false);
    let mut entries = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|source| InputError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        if is_blank(&record) {
            continue;
        }
        if record.len() != METADATA_FIELDS {
            return Err(InputError::Shape {
                path: origin.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: METADATA_FIELDS,
                found: record.len(),
            });
        }
        entries.push(MetadataEntry::new(&record[0], &record[1], &record[2]));
    }

    if entries.is_empty() {
        return Err(InputError::Empty {
            path: origin.to_path_buf(),
        });
    }

    Ok(entries)
}

/// Read a file fully and decode it to text.
///
/// Returns the text and the encoding used.
pub fn read_text(path: &Path) -> InputResult<(String, String)> {
    let bytes = fs::read(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding).map_err(|message| InputError::Encoding {
        path: path.to_path_buf(),
        message,
    })?;
    Ok((content, encoding))
}

/// Read a headered table file.
pub fn parse_table_file(path: &Path, delimiter: u8) -> InputResult<ParseResult> {
    let (content, encoding) = read_text(path)?;
    let table = parse_table(&content, delimiter, path)?;
    Ok(ParseResult { table, encoding })
}

/// Read a headerless metadata file.
pub fn parse_metadata_file(path: &Path, delimiter: u8) -> InputResult<Vec<MetadataEntry>> {
    let (content, _) = read_text(path)?;
    parse_metadata(&content, delimiter, path)
}
