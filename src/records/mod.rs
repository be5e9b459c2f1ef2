//! Typed records, one struct per entity, and the submission boundary that
//! turns raw form input into validated rows.

mod entities;
mod enums;

pub use entities::{Branch, CellReport, MeetingDay, Member, ServiceReport, Staff};
pub use enums::{BranchStatus, Gender, MemberStatus, StaffRole};

use crate::core::{AppError, Column, DataType, Result, Row, Value, parse_date};
use crate::schema::{EntityType, SchemaRegistry};
use chrono::NaiveDate;

/// A flat entity record that maps one-to-one onto a registry row.
pub trait Record: Sized {
    const ENTITY: EntityType;

    /// In-memory row, column order as in the registry.
    fn to_row(&self) -> Row;

    fn from_row(row: &[Value]) -> Result<Self>;
}

/// Coerces raw form values into a typed row for `entity`.
///
/// Field count and order must match the registry; every value must parse as
/// its column type and enum columns only accept their listed choices.
pub fn coerce_fields(entity: EntityType, fields: &[String]) -> Result<Row> {
    let schema = SchemaRegistry::schema(entity).schema();
    if fields.len() != schema.column_count() {
        return Err(AppError::SchemaMismatch(format!(
            "{} expects {} fields ({}), got {}",
            entity,
            schema.column_count(),
            schema.column_names().join(", "),
            fields.len()
        )));
    }

    let row = schema
        .columns()
        .iter()
        .zip(fields)
        .map(|(column, raw)| coerce_value(column, raw))
        .collect::<Result<Row>>()?;

    // Round-trip through the typed record so enum and range rules live in one place.
    match entity {
        EntityType::Branch => Branch::from_row(&row).map(|r| r.to_row()),
        EntityType::Member => Member::from_row(&row).map(|r| r.to_row()),
        EntityType::Staff => Staff::from_row(&row).map(|r| r.to_row()),
        EntityType::MeetingDay => MeetingDay::from_row(&row).map(|r| r.to_row()),
        EntityType::ServiceReport => ServiceReport::from_row(&row).map(|r| r.to_row()),
        EntityType::CellReport => CellReport::from_row(&row).map(|r| r.to_row()),
    }
}

fn coerce_value(column: &Column, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    let value = match column.data_type {
        DataType::Text => Some(Value::Text(raw.to_string())),
        DataType::Integer => raw.parse::<i64>().ok().map(Value::Integer),
        DataType::Decimal => raw.parse::<f64>().ok().map(Value::Float),
        DataType::Date => parse_date(raw).map(Value::Date),
    }
    .ok_or_else(|| {
        AppError::SchemaMismatch(format!(
            "Column '{}' expects {}, got '{}'",
            column.name, column.data_type, raw
        ))
    })?;
    column.validate(&value)?;
    Ok(value)
}

// Row accessors shared by the `from_row` impls.

fn arity<R: Record>(row: &[Value]) -> Result<()> {
    let expected = SchemaRegistry::schema(R::ENTITY).schema().column_count();
    if row.len() != expected {
        return Err(AppError::SchemaMismatch(format!(
            "{} expects {} columns, got {}",
            R::ENTITY,
            expected,
            row.len()
        )));
    }
    Ok(())
}

fn mismatch(entity: EntityType, idx: usize, expected: &str, got: &Value) -> AppError {
    let schema = SchemaRegistry::schema(entity).schema();
    let name = schema.columns().get(idx).map_or("?", |c| c.name.as_str());
    AppError::SchemaMismatch(format!(
        "Column '{}' of {} expects {}, got {}",
        name,
        entity,
        expected,
        got.type_name()
    ))
}

fn text(entity: EntityType, row: &[Value], idx: usize) -> Result<String> {
    row[idx]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(entity, idx, "TEXT", &row[idx]))
}

fn count(entity: EntityType, row: &[Value], idx: usize) -> Result<u32> {
    row[idx]
        .as_i64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| mismatch(entity, idx, "a non-negative INTEGER", &row[idx]))
}

fn decimal(entity: EntityType, row: &[Value], idx: usize) -> Result<f64> {
    row[idx]
        .as_f64()
        .filter(|n| *n >= 0.0 && n.is_finite())
        .ok_or_else(|| mismatch(entity, idx, "a non-negative DECIMAL", &row[idx]))
}

fn date(entity: EntityType, row: &[Value], idx: usize) -> Result<NaiveDate> {
    row[idx]
        .as_date()
        .ok_or_else(|| mismatch(entity, idx, "DATE", &row[idx]))
}

fn choice<T: std::str::FromStr<Err = AppError>>(entity: EntityType, row: &[Value], idx: usize) -> Result<T> {
    text(entity, row, idx)?.parse()
}
