//! In-memory mirror of the durable tables.
//!
//! One ordered [`Table`] per entity type, typed per the schema registry (date
//! columns hold real dates). A table is `Uninitialized` until hydrated from a
//! [`DurableStore`]; afterwards it only ever grows by [`EntityCache::append`].

use crate::core::{AppError, Result, Row};
use crate::schema::{EntityType, SchemaRegistry};
use crate::storage::{DurableStore, Table};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Uninitialized,
    Hydrated,
}

#[derive(Debug, Default)]
pub struct EntityCache {
    tables: HashMap<EntityType, Table>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates every entity type from `store`.
    pub fn init(&mut self, store: &dyn DurableStore) -> Result<()> {
        for entity in EntityType::ALL {
            self.hydrate(entity, store)?;
        }
        Ok(())
    }

    pub fn state(&self, entity: EntityType) -> CacheState {
        if self.tables.contains_key(&entity) {
            CacheState::Hydrated
        } else {
            CacheState::Uninitialized
        }
    }

    /// Loads the entity's table from `store` on first call; later calls
    /// return the cached table untouched.
    pub fn hydrate(&mut self, entity: EntityType, store: &dyn DurableStore) -> Result<&Table> {
        if !self.tables.contains_key(&entity) {
            let table = load_table(entity, store)?;
            info!(table = %entity, rows = table.row_count(), "hydrated cache table");
            self.tables.insert(entity, table);
        }
        self.snapshot(entity)
    }

    /// Replaces the cached table with a fresh scan of `store`.
    pub fn refresh(&mut self, entity: EntityType, store: &dyn DurableStore) -> Result<&Table> {
        let table = load_table(entity, store)?;
        info!(table = %entity, rows = table.row_count(), "re-hydrated cache table");
        self.tables.insert(entity, table);
        self.snapshot(entity)
    }

    /// Appends a row that has already been written to the durable store.
    pub fn append(&mut self, entity: EntityType, row: Row) -> Result<()> {
        let table = self
            .tables
            .get_mut(&entity)
            .ok_or_else(|| AppError::NotHydrated(entity.to_string()))?;
        table.schema().schema().validate_row(&row)?;
        let idx = table.push(row);
        debug!(table = %entity, row = idx, "appended row to cache");
        Ok(())
    }

    pub fn snapshot(&self, entity: EntityType) -> Result<&Table> {
        self.tables
            .get(&entity)
            .ok_or_else(|| AppError::NotHydrated(entity.to_string()))
    }

    pub fn row_count(&self, entity: EntityType) -> usize {
        self.tables.get(&entity).map_or(0, Table::row_count)
    }
}

fn load_table(entity: EntityType, store: &dyn DurableStore) -> Result<Table> {
    let schema = SchemaRegistry::schema(entity);
    let mut table = Table::new(schema.clone());
    for stored in store.scan(entity)? {
        let row = schema.schema().decode_row(stored)?;
        table.push(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::schema::columns::DATE_OF_BIRTH;
    use crate::storage::InMemoryStore;
    use chrono::NaiveDate;

    fn member_row(name: &str, dob: &str) -> Row {
        vec![
            Value::from(name),
            Value::from(dob),
            Value::from("a@b.c"),
            Value::from("0800"),
            Value::from("Female"),
            Value::from("Adult"),
        ]
    }

    #[test]
    fn test_hydrate_empty_store_has_columns() {
        let store = InMemoryStore::new();
        let mut cache = EntityCache::new();
        cache.init(&store).unwrap();

        for entity in EntityType::ALL {
            let table = cache.snapshot(entity).unwrap();
            assert_eq!(table.row_count(), 0);
            assert_eq!(
                table.column_names(),
                SchemaRegistry::schema(entity).schema().column_names()
            );
        }
    }

    #[test]
    fn test_hydrate_parses_dates() {
        let mut store = InMemoryStore::new();
        store.insert(EntityType::Member, member_row("Ada", "1990-06-15")).unwrap();

        let mut cache = EntityCache::new();
        let table = cache.hydrate(EntityType::Member, &store).unwrap();
        let dob = table.column_values(DATE_OF_BIRTH).unwrap().next().unwrap();
        assert_eq!(dob, &Value::Date(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap()));
    }

    #[test]
    fn test_hydrate_happens_once() {
        let mut store = InMemoryStore::new();
        let mut cache = EntityCache::new();
        assert_eq!(cache.state(EntityType::Member), CacheState::Uninitialized);
        cache.hydrate(EntityType::Member, &store).unwrap();
        assert_eq!(cache.state(EntityType::Member), CacheState::Hydrated);

        // A second hydrate does not pick up rows written behind the cache's back.
        store.insert(EntityType::Member, member_row("Ada", "1990-06-15")).unwrap();
        assert_eq!(cache.hydrate(EntityType::Member, &store).unwrap().row_count(), 0);
        assert_eq!(cache.refresh(EntityType::Member, &store).unwrap().row_count(), 1);
    }

    #[test]
    fn test_append_requires_hydration() {
        let mut cache = EntityCache::new();
        let err = cache
            .append(EntityType::MeetingDay, vec![Value::from("Sunday")])
            .unwrap_err();
        assert_eq!(err, AppError::NotHydrated("meeting_days".into()));
        assert!(cache.snapshot(EntityType::MeetingDay).is_err());
    }
}
