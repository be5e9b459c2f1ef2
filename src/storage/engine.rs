use crate::core::{Result, Row};
use crate::schema::EntityType;

/// Durable, append-only row storage keyed by entity type.
///
/// Rows cross this boundary in stored form: dates are `YYYY-MM-DD` text.
pub trait DurableStore: Send {
    /// Create the entity's table from its registry schema. No-op if it exists.
    fn ensure_table(&mut self, entity: EntityType) -> Result<()>;

    /// Append one row. Fails with `SchemaMismatch` if the row does not fit
    /// the registry schema; the write is committed before returning.
    fn insert(&mut self, entity: EntityType, row: Row) -> Result<()>;

    /// All rows of the entity's table in insertion order.
    fn scan(&self, entity: EntityType) -> Result<Vec<Row>>;

    /// Check if a table exists
    fn table_exists(&self, entity: EntityType) -> bool;
}
