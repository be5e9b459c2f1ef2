use super::{DurableStore, Table};
use crate::core::{Result, Row};
use crate::schema::{EntityType, SchemaRegistry};
use std::collections::HashMap;

/// Non-durable store that keeps stored-form rows in process memory.
///
/// Backs `--in-memory` sessions and tests; contents vanish with the process.
#[derive(Default)]
pub struct InMemoryStore {
    tables: HashMap<EntityType, Table>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self, entity: EntityType) -> usize {
        self.tables.get(&entity).map_or(0, Table::row_count)
    }
}

impl DurableStore for InMemoryStore {
    fn ensure_table(&mut self, entity: EntityType) -> Result<()> {
        self.tables
            .entry(entity)
            .or_insert_with(|| Table::new(SchemaRegistry::schema(entity).clone()));
        Ok(())
    }

    fn insert(&mut self, entity: EntityType, row: Row) -> Result<()> {
        SchemaRegistry::schema(entity).schema().validate_stored_row(&row)?;
        self.ensure_table(entity)?;
        if let Some(table) = self.tables.get_mut(&entity) {
            table.push(row);
        }
        Ok(())
    }

    fn scan(&self, entity: EntityType) -> Result<Vec<Row>> {
        Ok(self
            .tables
            .get(&entity)
            .map(|table| table.rows().to_vec())
            .unwrap_or_default())
    }

    fn table_exists(&self, entity: EntityType) -> bool {
        self.tables.contains_key(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AppError, Value};

    #[test]
    fn test_insert_and_scan() {
        let mut store = InMemoryStore::new();
        let row = vec![
            Value::from("Ago"),
            Value::from("Lagos"),
            Value::Integer(4),
            Value::from("Active"),
        ];
        store.insert(EntityType::Branch, row.clone()).unwrap();

        assert!(store.table_exists(EntityType::Branch));
        assert_eq!(store.scan(EntityType::Branch).unwrap(), vec![row]);
    }

    #[test]
    fn test_stored_dates_must_be_text() {
        let mut store = InMemoryStore::new();
        let row = vec![
            Value::from("Sunday"),
            Value::Integer(10),
            Value::Integer(4),
            Value::Integer(6),
            Value::Integer(0),
            Value::Integer(1),
            Value::from("not a date"),
        ];
        let err = store.insert(EntityType::ServiceReport, row).unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch(_)));
        assert_eq!(store.row_count(EntityType::ServiceReport), 0);
    }
}
