use super::value::DATE_FORMAT;
use super::{AppError, DataType, Result, Value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type Row = Vec<Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    /// Closed set of allowed values for enum columns; empty means free text.
    pub choices: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            choices: Vec::new(),
        }
    }

    pub fn one_of(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn is_enum(&self) -> bool {
        !self.choices.is_empty()
    }

    pub fn validate(&self, value: &Value) -> Result<()> {
        if !self.data_type.is_compatible(value) {
            return Err(AppError::SchemaMismatch(format!(
                "Column '{}' expects type {}, got {}",
                self.name,
                self.data_type,
                value.type_name()
            )));
        }

        if let Some(n) = value.as_f64()
            && (n < 0.0 || !n.is_finite())
        {
            return Err(AppError::SchemaMismatch(format!(
                "Column '{}' must be a non-negative number, got {}",
                self.name, value
            )));
        }

        if self.is_enum() {
            let text = value.as_str().unwrap_or_default();
            if !self.choices.iter().any(|c| c == text) {
                return Err(AppError::SchemaMismatch(format!(
                    "Column '{}' must be one of [{}], got '{}'",
                    self.name,
                    self.choices.join(", "),
                    text
                )));
            }
        }

        Ok(())
    }

    /// Converts an in-memory value into its stored form.
    pub fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Date(d) => Value::Text(d.format(DATE_FORMAT).to_string()),
            other => other.clone(),
        }
    }

    /// Converts a stored value back into its in-memory form.
    pub fn decode(&self, value: Value) -> Result<Value> {
        match (self.data_type, value) {
            (DataType::Date, Value::Text(s)) => parse_date(&s)
                .map(Value::Date)
                .ok_or_else(|| {
                    AppError::SchemaMismatch(format!(
                        "Column '{}' holds '{}', expected a YYYY-MM-DD date",
                        self.name, s
                    ))
                }),
            (_, other) => Ok(other),
        }
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn find_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.find_column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn date_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.data_type == DataType::Date)
            .map(|c| c.name.as_str())
            .collect()
    }

    fn check_arity(&self, row: &Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(AppError::SchemaMismatch(format!(
                "Expected {} columns, got {}",
                self.columns.len(),
                row.len()
            )));
        }
        Ok(())
    }

    /// Validates a row in its in-memory form.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        self.check_arity(row)?;
        for (column, value) in self.columns.iter().zip(row.iter()) {
            column.validate(value)?;
        }
        Ok(())
    }

    pub fn encode_row(&self, row: &Row) -> Row {
        self.columns
            .iter()
            .zip(row.iter())
            .map(|(column, value)| column.encode(value))
            .collect()
    }

    pub fn decode_row(&self, row: Row) -> Result<Row> {
        self.check_arity(&row)?;
        self.columns
            .iter()
            .zip(row)
            .map(|(column, value)| column.decode(value))
            .collect()
    }

    /// Validates a row in its stored form (dates as text).
    pub fn validate_stored_row(&self, row: &Row) -> Result<()> {
        let decoded = self.decode_row(row.clone())?;
        self.validate_row(&decoded)
    }
}
