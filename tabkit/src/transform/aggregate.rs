//! Pivot long-format metadata into a single wide record.
//!
//! ```text
//! attribute value unit            ┌─────┬───┐
//! x         1     cm              │ x   │ y │
//! y         2     kg      →       ├─────┼───┤
//! x         3     cm              │ 1,3 │ 2 │
//!                                 └─────┴───┘
//! ```
//!
//! Attributes keep the order of their first appearance and repeated
//! attributes join their values in input order.

use std::collections::HashMap;

use crate::logs::log_warning;
use crate::models::{Cell, MetadataEntry, Table};

/// One aggregated metadata row: distinct attributes with joined values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    fields: Vec<(String, String)>,
}

impl MetadataRecord {
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Joined value for `attribute`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Single-row table of this record.
    ///
    /// With `index = Some((name, id))` the first column is `name`
    /// holding `id`.
    pub fn to_table(&self, index: Option<(&str, &str)>) -> Table {
        let mut columns = Vec::with_capacity(self.fields.len() + 1);
        let mut row = Vec::with_capacity(self.fields.len() + 1);

        if let Some((name, id)) = index {
            columns.push(name.to_string());
            row.push(Cell::text(id));
        }
        for (attribute, value) in &self.fields {
            columns.push(attribute.clone());
            row.push(Cell::text(value.as_str()));
        }

        Table::from_rows(columns, vec![row])
    }
}

/// Accumulates the values of one attribute.
struct AttributeBuilder {
    name: String,
    values: Vec<String>,
}

impl AttributeBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
        }
    }

    fn add_value(&mut self, value: &str) {
        if !value.is_empty() {
            self.values.push(value.to_string());
        }
    }

    fn build(self, separator: &str) -> (String, String) {
        (self.name, self.values.join(separator))
    }
}

/// Group entries by attribute and join each group's values with `separator`.
///
/// Entries without an attribute name are skipped. Empty values are left
/// out of the join; an attribute with only empty values maps to `""`.
/// The unit column plays no part.
pub fn aggregate(entries: &[MetadataEntry], separator: &str) -> MetadataRecord {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut builders: Vec<AttributeBuilder> = Vec::new();

    for (row, entry) in entries.iter().enumerate() {
        if entry.attribute.is_empty() {
            log_warning(format!("Skipping row {} with an empty attribute name", row + 1));
            continue;
        }

        let idx = *positions.entry(entry.attribute.as_str()).or_insert_with(|| {
            builders.push(AttributeBuilder::new(&entry.attribute));
            builders.len() - 1
        });
        builders[idx].add_value(&entry.value);
    }

    MetadataRecord {
        fields: builders.into_iter().map(|b| b.build(separator)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<MetadataEntry> {
        vec![
            MetadataEntry::new("x", "1", "cm"),
            MetadataEntry::new("y", "2", "kg"),
            MetadataEntry::new("x", "3", "cm"),
        ]
    }

    #[test]
    fn test_duplicate_attributes_joined() {
        let record = aggregate(&entries(), ",");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("x"), Some("1,3"));
        assert_eq!(record.get("y"), Some("2"));
    }

    #[test]
    fn test_first_appearance_order() {
        let record = aggregate(
            &[
                MetadataEntry::new("zeta", "a", ""),
                MetadataEntry::new("alpha", "b", ""),
                MetadataEntry::new("zeta", "c", ""),
            ],
            ",",
        );
        let names: Vec<&str> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_custom_separator() {
        let record = aggregate(&entries(), " | ");
        assert_eq!(record.get("x"), Some("1 | 3"));
    }

    #[test]
    fn test_units_ignored() {
        let record = aggregate(
            &[
                MetadataEntry::new("len", "1", "cm"),
                MetadataEntry::new("len", "2", "m"),
            ],
            ";",
        );
        assert_eq!(record.fields(), &[("len".to_string(), "1;2".to_string())]);
    }

    #[test]
    fn test_empty_values_and_attributes() {
        let record = aggregate(
            &[
                MetadataEntry::new("x", "", ""),
                MetadataEntry::new("", "orphan", ""),
                MetadataEntry::new("y", "1", ""),
                MetadataEntry::new("y", "", ""),
            ],
            ",",
        );

        assert_eq!(record.get("x"), Some(""));
        assert_eq!(record.get("y"), Some("1"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_to_table_with_index() {
        let table = aggregate(&entries(), ",").to_table(Some(("id", "sample1")));

        assert_eq!(table.columns(), &["id", "x", "y"]);
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.cell(0, "id"), Some(&Cell::text("sample1")));
        assert_eq!(table.cell(0, "x"), Some(&Cell::text("1,3")));
    }

    #[test]
    fn test_to_table_without_index() {
        let table = aggregate(&entries(), ",").to_table(None);
        assert_eq!(table.columns(), &["x", "y"]);
    }
}
