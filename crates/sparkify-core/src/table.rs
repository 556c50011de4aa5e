//! Output table catalog, column types, and row cells.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The five star-schema tables written by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTable {
    /// Song dimension
    Songs,
    /// Artist dimension
    Artists,
    /// User dimension
    Users,
    /// Time dimension
    Time,
    /// Songplay fact table
    Songplays,
}

impl OutputTable {
    /// Every table, in the order the pipelines produce them.
    pub const ALL: [OutputTable; 5] = [
        OutputTable::Songs,
        OutputTable::Artists,
        OutputTable::Users,
        OutputTable::Time,
        OutputTable::Songplays,
    ];

    /// Table name, also used as the output directory name.
    pub fn name(&self) -> &'static str {
        match self {
            OutputTable::Songs => "songs",
            OutputTable::Artists => "artists",
            OutputTable::Users => "users",
            OutputTable::Time => "time",
            OutputTable::Songplays => "songplays",
        }
    }

    /// Hive-style partition columns, outermost first.
    pub fn partition_by(&self) -> &'static [&'static str] {
        match self {
            OutputTable::Songs => &["year", "artist_id"],
            OutputTable::Time | OutputTable::Songplays => &["year", "month"],
            OutputTable::Artists | OutputTable::Users => &[],
        }
    }

}

impl fmt::Display for OutputTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Logical column type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    BigInt,
    Double,
    /// Microsecond-precision timestamp without zone
    Timestamp,
}

impl ColumnType {
    /// SQL type name used when staging the column.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Text => "VARCHAR",
            ColumnType::Integer => "INTEGER",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_type())
    }
}

/// Static description of one output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// A single cell of an output row.
///
/// Equality and hashing compare doubles by bit pattern so a full-row tuple
/// can serve as a dedup key; `NaN` equals itself and `0.0` differs from `-0.0`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i32),
    BigInt(i64),
    Double(f64),
    /// Microseconds since the Unix epoch
    Timestamp(i64),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::BigInt(a), CellValue::BigInt(b)) => a == b,
            (CellValue::Double(a), CellValue::Double(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(v) => v.hash(state),
            CellValue::BigInt(v) => v.hash(state),
            CellValue::Double(v) => v.to_bits().hash(state),
            CellValue::Timestamp(v) => v.hash(state),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::BigInt(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Double(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Timestamp(value.timestamp_micros())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// A typed row of one output table
pub trait TableRow {
    /// The table this row belongs to
    const TABLE: OutputTable;

    /// Column definitions, in output order
    fn columns() -> &'static [ColumnDef];

    /// The row's cells, aligned with [`TableRow::columns`]
    fn cells(&self) -> Vec<CellValue>;
}

/// Column-described rows of one table, ready to hand to the engine
#[derive(Debug, Clone)]
pub struct Frame {
    pub table: OutputTable,
    pub columns: &'static [ColumnDef],
    pub rows: Vec<Vec<CellValue>>,
}

impl Frame {
    /// Build a frame from typed rows.
    pub fn from_rows<T: TableRow>(rows: &[T]) -> Self {
        Self {
            table: T::TABLE,
            columns: T::columns(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Drop rows equal on the full tuple, keeping the first occurrence.
pub fn dedup_rows<T: TableRow>(rows: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen: HashSet<Vec<CellValue>> = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.cells()))
        .collect()
}

/// Drop rows sharing a key, keeping the first occurrence.
pub fn dedup_by_key<T, K, F>(rows: impl IntoIterator<Item = T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen: HashSet<K> = HashSet::new();
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
