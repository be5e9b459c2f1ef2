use super::DataPoint;
use crate::core::{AppError, DataType, Result, Value};
use crate::schema::columns::{MEETING_DAY, TOTAL_ATTENDANCE};
use crate::storage::Table;
use std::collections::HashMap;

/// Counts rows per queried category. Categories with no rows report zero.
pub fn category_counts(table: &Table, column: &str, categories: &[&str]) -> Result<Vec<(String, usize)>> {
    let counts = value_counts(table, column)?;
    Ok(categories
        .iter()
        .map(|category| {
            let n = counts
                .iter()
                .find(|(value, _)| value == category)
                .map_or(0, |(_, n)| *n);
            (category.to_string(), n)
        })
        .collect())
}

/// Counts rows per distinct value, in first-seen order.
pub fn value_counts(table: &Table, column: &str) -> Result<Vec<(String, usize)>> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in table.column_values(column)? {
        let key = value.to_string();
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    Ok(counts)
}

/// Sum of a numeric column; zero of the column's type when the table is empty.
pub fn numeric_sum(table: &Table, column: &str) -> Result<Value> {
    let mut total = zero_of(table, column)?;
    for value in table.column_values(column)? {
        total = add(&total, value);
    }
    Ok(total)
}

/// Groups rows by `key_column` and sums `value_column` per group, in
/// first-seen group order.
pub fn group_sum(table: &Table, key_column: &str, value_column: &str) -> Result<Vec<DataPoint>> {
    let zero = zero_of(table, value_column)?;
    let key_idx = table.column_index(key_column)?;
    let value_idx = table.column_index(value_column)?;
    grouped(table, zero, value_idx, |row| row[key_idx].to_string())
}

/// Like [`group_sum`], keyed by the `YYYY-MM` month of a date column.
pub fn monthly_sum(table: &Table, date_column: &str, value_column: &str) -> Result<Vec<DataPoint>> {
    let zero = zero_of(table, value_column)?;
    let date_idx = table.column_index(date_column)?;
    let value_idx = table.column_index(value_column)?;
    grouped(table, zero, value_idx, |row| match row[date_idx].as_date() {
        Some(d) => d.format("%Y-%m").to_string(),
        None => row[date_idx].to_string(),
    })
}

/// Total attendance per meeting day across service reports.
pub fn attendance_by_meeting_day(reports: &Table) -> Result<Vec<DataPoint>> {
    group_sum(reports, MEETING_DAY, TOTAL_ATTENDANCE)
}

/// Row count followed by the sum of every numeric column.
pub fn column_totals(table: &Table) -> Result<Vec<DataPoint>> {
    let mut totals = vec![DataPoint::new("Reports", table.row_count() as i64)];
    for column in table.schema().schema().columns() {
        if column.data_type.is_numeric() {
            totals.push(DataPoint::new(column.name.clone(), numeric_sum(table, &column.name)?));
        }
    }
    Ok(totals)
}

fn grouped<F>(table: &Table, zero: Value, value_idx: usize, key_of: F) -> Result<Vec<DataPoint>>
where
    F: Fn(&[Value]) -> String,
{
    let mut groups: Vec<DataPoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in table.rows() {
        let key = key_of(row);
        let i = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(DataPoint::new(key, zero.clone()));
            groups.len() - 1
        });
        groups[i].value = add(&groups[i].value, &row[value_idx]);
    }
    Ok(groups)
}

fn zero_of(table: &Table, column: &str) -> Result<Value> {
    let col = table.column(column)?;
    match col.data_type {
        DataType::Integer => Ok(Value::Integer(0)),
        DataType::Decimal => Ok(Value::Float(0.0)),
        other => Err(AppError::SchemaMismatch(format!(
            "Column '{}' of '{}' is {}, not numeric",
            column,
            table.name(),
            other
        ))),
    }
}

fn add(acc: &Value, value: &Value) -> Value {
    match (acc, value) {
        (Value::Integer(a), Value::Integer(b)) => Value::Integer(a + b),
        (a, b) => Value::Float(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0)),
    }
}
