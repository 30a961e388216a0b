//! Rectangular tables assembled from per-asset columns or records
//!
//! Rows are indexed by a shared coordinate (date strings or metric field
//! paths), columns by asset keys, in caller order. Only price-history
//! alignment zero-pads; metrics assembly leaves a missing marker instead.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

impl Cell {
    /// Convert a JSON scalar into a cell; nested containers are rendered as
    /// compact JSON text, null becomes the missing marker.
    pub fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Cell::Number(f),
                None => Cell::Missing,
            },
            Value::String(s) => Cell::Text(s.clone()),
            nested => Cell::Text(nested.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Missing => write!(f, "NaN"),
        }
    }
}

/// Rectangular table: row index, ordered columns, column-major cells
///
/// Every column holds exactly `index.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from equal-length numeric columns (price-history case)
    ///
    /// Column order is preserved. Fails with [`Error::DuplicateKey`] on a
    /// repeated column name and [`Error::MalformedResponse`] on a column
    /// whose length differs from the index.
    pub fn from_columns(index: Vec<String>, columns: Vec<(String, Vec<f64>)>) -> Result<Table> {
        let mut names = Vec::with_capacity(columns.len());
        let mut cells = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            if names.contains(&name) {
                return Err(Error::DuplicateKey(name));
            }
            if values.len() != index.len() {
                return Err(Error::MalformedResponse(format!(
                    "column `{}` has {} rows, index has {}",
                    name,
                    values.len(),
                    index.len()
                )));
            }
            names.push(name);
            cells.push(values.into_iter().map(Cell::Number).collect());
        }

        Ok(Table {
            index,
            columns: names,
            cells,
        })
    }

    /// Build a table from per-asset records (metrics case)
    ///
    /// The row index is the union of field paths across all records; a field
    /// absent for some asset leaves [`Cell::Missing`] there, never zero.
    pub fn from_records(records: Vec<(String, BTreeMap<String, Cell>)>) -> Result<Table> {
        let index: Vec<String> = records
            .iter()
            .flat_map(|(_, record)| record.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns = Vec::with_capacity(records.len());
        let mut cells = Vec::with_capacity(records.len());

        for (name, record) in records {
            if columns.contains(&name) {
                return Err(Error::DuplicateKey(name));
            }
            let column: Vec<Cell> = index
                .iter()
                .map(|field| record.get(field).cloned().unwrap_or(Cell::Missing))
                .collect();
            columns.push(name);
            cells.push(column);
        }

        Ok(Table {
            index,
            columns,
            cells,
        })
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    /// Cells of one column, in row order
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(&self.cells[pos])
    }

    /// Write the table as CSV: a header of column names behind an empty
    /// index cell, then one record per row.
    pub fn write_csv<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());
        wtr.write_record(&header)?;

        for (row, label) in self.index.iter().enumerate() {
            let mut record = vec![label.clone()];
            record.extend(self.cells.iter().map(|col| col[row].to_string()));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.index.iter().map(String::len).max().unwrap_or(0);

        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&self.cells)
            .map(|(name, col)| {
                col.iter()
                    .map(|c| c.to_string().len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, &width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name)?;
        }
        writeln!(f)?;

        for (row, label) in self.index.iter().enumerate() {
            write!(f, "{:index_width$}", label)?;
            for (col, &width) in self.cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", col[row].to_string())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_preserves_order() {
        let table = Table::from_columns(
            vec!["2021-01-01".to_string(), "2021-01-02".to_string()],
            vec![
                ("bitcoin".to_string(), vec![10.0, 20.0]),
                ("ethereum".to_string(), vec![1.0, 2.0]),
            ],
        )
        .unwrap();
        assert_eq!(table.columns(), ["bitcoin", "ethereum"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("ethereum").unwrap(),
            [Cell::Number(1.0), Cell::Number(2.0)]
        );
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let err = Table::from_columns(
            vec!["2021-01-01".to_string(), "2021-01-02".to_string()],
            vec![("bitcoin".to_string(), vec![10.0])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_from_columns_rejects_duplicate() {
        let err = Table::from_columns(
            vec!["2021-01-01".to_string()],
            vec![
                ("bitcoin".to_string(), vec![10.0]),
                ("bitcoin".to_string(), vec![11.0]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref k) if k == "bitcoin"));
    }

    #[test]
    fn test_from_records_missing_marker() {
        let mut a = BTreeMap::new();
        a.insert("price".to_string(), Cell::Number(1.0));
        a.insert("rank".to_string(), Cell::Number(2.0));
        let mut b = BTreeMap::new();
        b.insert("price".to_string(), Cell::Number(3.0));

        let table =
            Table::from_records(vec![("a".to_string(), a), ("b".to_string(), b)]).unwrap();
        assert_eq!(table.index(), ["price", "rank"]);
        assert_eq!(
            table.column("b").unwrap(),
            [Cell::Number(3.0), Cell::Missing]
        );
    }

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(&serde_json::json!(1.5)), Cell::Number(1.5));
        assert_eq!(Cell::from_json(&serde_json::json!(null)), Cell::Missing);
        assert_eq!(
            Cell::from_json(&serde_json::json!({"a": 1})),
            Cell::Text("{\"a\":1}".to_string())
        );
    }

    #[test]
    fn test_write_csv() {
        let table = Table::from_columns(
            vec!["2021-01-01".to_string()],
            vec![("bitcoin".to_string(), vec![10.0])],
        )
        .unwrap();

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(csv, ",bitcoin\n2021-01-01,10\n");
    }
}
