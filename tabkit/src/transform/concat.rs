//! Concatenate tables along rows or columns.
//!
//! ```text
//! rows, outer                      columns, outer
//! ┌───┬───┐   ┌───┬───┐           ┌───┐   ┌───┐
//! │ A │ B │ + │ B │ C │           │ A │ + │ B │
//! └───┴───┘   └───┴───┘           │ 1 │   │ 2 │
//!      ↓                          │ 3 │   └───┘
//! ┌───┬───┬───┐                   └───┘
//! │ A │ B │ C │                      ↓
//! │ 1 │ 2 │ ∅ │                   ┌───┬───┐
//! │ ∅ │ 3 │ 4 │                   │ A │ B │
//! └───┴───┴───┘                   │ 1 │ 2 │
//!                                 │ 3 │ ∅ │
//!                                 └───┴───┘
//! ```

use crate::models::{Axis, Cell, Join, Table};

/// Concatenate `tables` in order along `axis`.
///
/// An empty slice yields an empty table.
pub fn concat(tables: &[Table], axis: Axis, join: Join) -> Table {
    match axis {
        Axis::Rows => concat_rows(tables, join),
        Axis::Columns => concat_columns(tables, join),
    }
}

/// Column labels kept when stacking rows.
///
/// Outer keeps every label in first-appearance order; inner keeps the
/// labels of the first table that every other table also has.
fn shared_columns(tables: &[Table], join: Join) -> Vec<String> {
    let Some(first) = tables.first() else {
        return Vec::new();
    };

    let mut columns: Vec<String> = Vec::new();
    match join {
        Join::Outer => {
            for name in tables.iter().flat_map(|t| t.columns()) {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        Join::Inner => {
            for name in first.columns() {
                if !columns.contains(name)
                    && tables[1..].iter().all(|t| t.column_index(name).is_some())
                {
                    columns.push(name.clone());
                }
            }
        }
    }
    columns
}

fn concat_rows(tables: &[Table], join: Join) -> Table {
    let columns = shared_columns(tables, join);
    let mut out = Table::new(columns);

    for table in tables {
        let mapping: Vec<Option<usize>> = out
            .columns()
            .iter()
            .map(|name| table.column_index(name))
            .collect();

        for row in table.rows() {
            let cells = mapping
                .iter()
                .map(|src| src.map_or(Cell::Null, |i| row[i].clone()))
                .collect();
            out.push_row(cells);
        }
    }

    out
}

fn concat_columns(tables: &[Table], join: Join) -> Table {
    let heights = tables.iter().map(Table::num_rows);
    let height = match join {
        Join::Outer => heights.max(),
        Join::Inner => heights.min(),
    }
    .unwrap_or(0);

    let columns = tables
        .iter()
        .flat_map(|t| t.columns().iter().cloned())
        .collect();
    let mut out = Table::new(columns);

    for i in 0..height {
        let mut cells = Vec::with_capacity(out.num_columns());
        for table in tables {
            match table.rows().get(i) {
                Some(row) => cells.extend(row.iter().cloned()),
                None => cells.extend(std::iter::repeat(Cell::Null).take(table.num_columns())),
            }
        }
        out.push_row(cells);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellKind;

    fn int(v: &str) -> Cell {
        Cell::typed(v, CellKind::Integer)
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| int(v)).collect::<Vec<Cell>>())
                .collect(),
        )
    }

    fn ab() -> Table {
        table(&["A", "B"], &[&["1", "2"], &["3", "4"]])
    }

    fn bc() -> Table {
        table(&["B", "C"], &[&["5", "6"]])
    }

    #[test]
    fn test_rows_outer_unions_columns() {
        let out = concat(&[ab(), bc()], Axis::Rows, Join::Outer);

        assert_eq!(out.columns(), &["A", "B", "C"]);
        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.rows()[0], vec![int("1"), int("2"), Cell::Null]);
        assert_eq!(out.rows()[2], vec![Cell::Null, int("5"), int("6")]);
    }

    #[test]
    fn test_rows_inner_intersects_columns() {
        let out = concat(&[ab(), bc()], Axis::Rows, Join::Inner);

        assert_eq!(out.columns(), &["B"]);
        assert_eq!(out.num_rows(), 3);
        assert_eq!(
            out.rows().iter().map(|r| r[0].clone()).collect::<Vec<_>>(),
            vec![int("2"), int("4"), int("5")]
        );
    }

    #[test]
    fn test_rows_keep_input_order() {
        let t1 = table(&["x"], &[&["1"]]);
        let t2 = table(&["x"], &[&["2"], &["3"]]);
        let t3 = table(&["x"], &[&["4"]]);

        let out = concat(&[t1, t2, t3], Axis::Rows, Join::Outer);
        let values: Vec<&str> = out.rows().iter().filter_map(|r| r[0].as_str()).collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_rows_inner_disjoint_is_empty_width() {
        let out = concat(
            &[table(&["a"], &[&["1"]]), table(&["b"], &[&["2"]])],
            Axis::Rows,
            Join::Inner,
        );
        assert_eq!(out.num_columns(), 0);
        assert_eq!(out.num_rows(), 2);
    }

    #[test]
    fn test_columns_outer_pads() {
        let out = concat(&[ab(), bc()], Axis::Columns, Join::Outer);

        assert_eq!(out.columns(), &["A", "B", "B", "C"]);
        assert_eq!(out.num_rows(), 2);
        assert_eq!(out.rows()[0], vec![int("1"), int("2"), int("5"), int("6")]);
        assert_eq!(out.rows()[1], vec![int("3"), int("4"), Cell::Null, Cell::Null]);
    }

    #[test]
    fn test_columns_inner_truncates() {
        let out = concat(&[ab(), bc()], Axis::Columns, Join::Inner);

        assert_eq!(out.num_rows(), 1);
        assert_eq!(out.rows()[0], vec![int("1"), int("2"), int("5"), int("6")]);
    }

    #[test]
    fn test_single_table_unchanged() {
        let out = concat(&[ab()], Axis::Rows, Join::Inner);
        assert_eq!(out, ab());
    }

    #[test]
    fn test_no_tables() {
        let out = concat(&[], Axis::Columns, Join::Outer);
        assert_eq!(out.num_columns(), 0);
        assert_eq!(out.num_rows(), 0);
    }
}
