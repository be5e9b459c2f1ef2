use crate::core::{AppError, Column, Result, Row, Schema, Value};
use serde::{Deserialize, Serialize};

/// Ordered, append-only table of rows sharing one schema.
///
/// Used both as the cache's in-memory table (typed values, real dates) and
/// as the backing table of [`crate::storage::InMemoryStore`] (stored form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Appends a row that has already been validated by the caller.
    pub fn push(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.schema().column_names()
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .schema()
            .find_column_index(column)
            .ok_or_else(|| AppError::UnknownColumn(column.to_string(), self.name().to_string()))
    }

    pub fn column(&self, column: &str) -> Result<&Column> {
        let idx = self.column_index(column)?;
        Ok(&self.schema.schema().columns()[idx])
    }

    /// Iterates the values of one column in insertion order.
    pub fn column_values<'a>(&'a self, column: &str) -> Result<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    schema: Schema,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            schema: Schema::new(columns),
        }
    }
    pub fn name(&self) -> &str { &self.name }
    pub fn schema(&self) -> &Schema { &self.schema }
}
