//! Rendering tables to CSV and JSON, and writing output files.
//!
//! Rendering happens fully in memory. [`write_files`] stages every file
//! in a temporary file next to its destination and only renames them
//! into place once all of them were written, so a failed run leaves no
//! truncated outputs behind.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{OutputError, OutputResult};
use crate::models::{Cell, Table};

/// JSON indentation used for every pretty-printed document.
const JSON_INDENT: &[u8] = b"    ";

/// A rendered output waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

// =============================================================================
// Serialization helpers
// =============================================================================

/// One row as a JSON object, optionally leaving out one column.
struct RowObject<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
    skip: Option<usize>,
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.columns.len() - usize::from(self.skip.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (i, (name, cell)) in self.columns.iter().zip(self.cells).enumerate() {
            if Some(i) == self.skip {
                continue;
            }
            map.serialize_entry(name, &cell.to_json())?;
        }
        map.end()
    }
}

/// Every row as an array of objects.
struct Records<'a>(&'a Table);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let table = self.0;
        let mut seq = serializer.serialize_seq(Some(table.num_rows()))?;
        for row in table.rows() {
            seq.serialize_element(&RowObject {
                columns: table.columns(),
                cells: row,
                skip: None,
            })?;
        }
        seq.end()
    }
}

/// Rows keyed by the text of one column.
struct Indexed<'a> {
    table: &'a Table,
    index: usize,
}

impl Serialize for Indexed<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.num_rows()))?;
        for row in self.table.rows() {
            map.serialize_entry(
                row[self.index].to_field(),
                &RowObject {
                    columns: self.table.columns(),
                    cells: row,
                    skip: Some(self.index),
                },
            )?;
        }
        map.end()
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> OutputResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Fail when two of `columns` share a name.
fn ensure_unique<'a>(columns: impl IntoIterator<Item = &'a String>) -> OutputResult<()> {
    let mut seen: Vec<&String> = Vec::new();
    for name in columns {
        if seen.contains(&name) {
            return Err(OutputError::DuplicateColumn(name.clone()));
        }
        seen.push(name);
    }
    Ok(())
}

// =============================================================================
// Renderers
// =============================================================================

/// Delimited text with a header row and no index column.
pub fn render_csv(table: &Table) -> OutputResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(Cell::to_field))?;
    }
    wtr.into_inner()
        .map_err(|e| OutputError::Csv(csv::Error::from(e.into_error())))
}

/// A JSON array of row objects, indented with four spaces.
pub fn render_json_records(table: &Table) -> OutputResult<Vec<u8>> {
    ensure_unique(table.columns())?;
    to_pretty_json(&Records(table))
}

/// One compact JSON object per line.
pub fn render_json_lines(table: &Table) -> OutputResult<Vec<u8>> {
    ensure_unique(table.columns())?;
    let mut buf = Vec::new();
    for row in table.rows() {
        serde_json::to_writer(
            &mut buf,
            &RowObject {
                columns: table.columns(),
                cells: row,
                skip: None,
            },
        )?;
        buf.push(b'\n');
    }
    Ok(buf)
}

/// A JSON object mapping the text of column `index` to the rest of the row.
pub fn render_json_indexed(table: &Table, index: usize) -> OutputResult<Vec<u8>> {
    ensure_unique(
        table
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, name)| name),
    )?;
    to_pretty_json(&Indexed { table, index })
}

// =============================================================================
// Writing
// =============================================================================

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Write every file, or none of them.
///
/// Files are staged next to their destination and renamed into place once
/// all are staged. If a rename fails, outputs already moved are removed.
pub fn write_files(files: &[OutputFile]) -> OutputResult<()> {
    let mut staged = Vec::with_capacity(files.len());

    for file in files {
        let dir = staging_dir(&file.path);
        let io_err = |source| OutputError::Io {
            path: file.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&file.contents).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        staged.push((tmp, &file.path));
    }

    let mut persisted: Vec<&PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in persisted {
                if let Err(err) = fs::remove_file(done) {
                    warn!(path = %done.display(), error = %err, "cannot remove partial output");
                }
            }
            return Err(OutputError::Persist {
                path: path.clone(),
                source: e.error,
            });
        }
        persisted.push(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellKind;
    use serde_json::{json, Value};

    fn sample() -> Table {
        Table::from_rows(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![
                    Cell::typed("1", CellKind::Integer),
                    Cell::text("x"),
                    Cell::Null,
                ],
                vec![
                    Cell::Null,
                    Cell::text("y, z"),
                    Cell::typed("2.50", CellKind::Float),
                ],
            ],
        )
    }

    #[test]
    fn test_csv_output() {
        let csv = String::from_utf8(render_csv(&sample()).unwrap()).unwrap();
        assert_eq!(csv, "A,B,C\n1,x,\n,\"y, z\",2.50\n");
    }

    #[test]
    fn test_json_records() {
        let bytes = render_json_records(&sample()).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            parsed,
            json!([
                {"A": 1, "B": "x", "C": null},
                {"A": null, "B": "y, z", "C": 2.5}
            ])
        );
    }

    #[test]
    fn test_json_keeps_column_order_and_indent() {
        let table = Table::from_rows(
            vec!["z".into(), "a".into()],
            vec![vec![Cell::text("1"), Cell::text("2")]],
        );
        let text = String::from_utf8(render_json_records(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "[\n    {\n        \"z\": \"1\",\n        \"a\": \"2\"\n    }\n]\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let text = String::from_utf8(render_json_lines(&sample()).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"A":1,"B":"x","C":null}"#);
    }

    #[test]
    fn test_json_indexed() {
        let table = Table::from_rows(
            vec!["id".into(), "x".into(), "y".into()],
            vec![vec![Cell::text("sample1"), Cell::text("1,3"), Cell::text("2")]],
        );
        let parsed: Value =
            serde_json::from_slice(&render_json_indexed(&table, 0).unwrap()).unwrap();

        assert_eq!(parsed, json!({"sample1": {"x": "1,3", "y": "2"}}));
    }

    #[test]
    fn test_indexed_allows_index_name_clash() {
        let table = Table::from_rows(
            vec!["id".into(), "id".into()],
            vec![vec![Cell::text("s1"), Cell::text("v")]],
        );
        let parsed: Value =
            serde_json::from_slice(&render_json_indexed(&table, 0).unwrap()).unwrap();
        assert_eq!(parsed, json!({"s1": {"id": "v"}}));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let table = Table::new(vec!["a".into(), "b".into(), "a".into()]);

        let err = render_json_records(&table).unwrap_err();
        assert!(matches!(err, OutputError::DuplicateColumn(ref name) if name == "a"));
        assert!(render_json_lines(&table).is_err());
        // CSV tolerates repeated headers
        assert!(render_csv(&table).is_ok());
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(vec!["a".into()]);
        assert_eq!(render_csv(&table).unwrap(), b"a\n");
        assert_eq!(render_json_records(&table).unwrap(), b"[]\n");
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            OutputFile::new(dir.path().join("out.csv"), b"a\n1\n".to_vec()),
            OutputFile::new(dir.path().join("nested/out.json"), b"[]\n".to_vec()),
        ];

        write_files(&files).unwrap();

        assert_eq!(fs::read(dir.path().join("out.csv")).unwrap(), b"a\n1\n");
        assert_eq!(fs::read(dir.path().join("nested/out.json")).unwrap(), b"[]\n");
        // no staging files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_rename_removes_written_outputs() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in the way of the second output makes its rename fail
        fs::create_dir(dir.path().join("out.json")).unwrap();
        let files = vec![
            OutputFile::new(dir.path().join("out.csv"), b"a\n1\n".to_vec()),
            OutputFile::new(dir.path().join("out.json"), b"[]\n".to_vec()),
        ];

        let err = write_files(&files).unwrap_err();

        assert!(matches!(err, OutputError::Persist { .. }));
        assert!(!dir.path().join("out.csv").exists());
        assert!(dir.path().join("out.json").is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_staging_dir_for_bare_name() {
        assert_eq!(staging_dir(Path::new("metadata.csv")), Path::new("."));
        assert_eq!(staging_dir(Path::new("out/x.csv")), Path::new("out"));
    }
}
