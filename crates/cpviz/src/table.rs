#![forbid(unsafe_code)]

//! Companion table model.
//!
//! The table widget itself (rendering, sorting, paging) lives outside this
//! crate. The engine hands it a flat [`TableModel`] and consumes the two
//! [`TableEvent`]s it emits.

use crate::data::{Dataset, JoinKey};

/// Hover events emitted by the table widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    RowEnter(JoinKey),
    RowLeave(JoinKey),
}

impl TableEvent {
    pub fn key(&self) -> &JoinKey {
        match self {
            Self::RowEnter(key) | Self::RowLeave(key) => key,
        }
    }
}

/// One observation row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub key: JoinKey,
    /// Display text per column, aligned with [`TableModel::columns`].
    pub cells: Vec<String>,
}

/// Observations as a flat table: one row per observation in input order,
/// columns taken from the first observation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableModel {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl TableModel {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let columns = dataset
            .observations()
            .first()
            .map(|o| o.columns())
            .unwrap_or_default();
        let rows = dataset
            .observations()
            .iter()
            .map(|obs| TableRow {
                key: obs.join_key(),
                cells: columns
                    .iter()
                    .map(|c| obs.field(c).map(|v| v.to_string()).unwrap_or_default())
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row with `key`.
    pub fn row(&self, key: &JoinKey) -> Option<&TableRow> {
        self.rows.iter().find(|r| &r.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_from_first_observation() {
        let dataset = Dataset::new(
            Vec::new(),
            vec![
                Observation::new("7", "lm", 1.5, Some(2.0))
                    .with_feature("age", 30.0)
                    .with_feature("city", "Oslo"),
                Observation::new("8", "lm", 0.5, None).with_feature("age", 41.0),
            ],
        )
        .unwrap();
        let table = TableModel::from_dataset(&dataset);
        assert_eq!(
            table.columns(),
            &["age", "city", "_yhat_", "_label_", "_ids_", "_y_"].map(String::from)[..]
        );
        assert_eq!(
            table.rows()[0].cells,
            vec!["30", "Oslo", "1.5", "lm", "7", "2"]
        );
        assert_eq!(table.rows()[1].cells, vec!["41", "", "0.5", "lm", "8", ""]);
        assert_eq!(
            table.row(&JoinKey::new("8", "lm")).map(|r| r.cells.len()),
            Some(6)
        );
    }

    #[test]
    fn empty_dataset_gives_empty_table() {
        let dataset = Dataset::new(Vec::new(), Vec::new()).unwrap();
        let table = TableModel::from_dataset(&dataset);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn event_key() {
        let key = JoinKey::new("1", "lm");
        assert_eq!(TableEvent::RowLeave(key.clone()).key(), &key);
    }
}
