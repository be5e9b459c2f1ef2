//! Schema registry: the column layout of every entity table.

pub mod columns;

use crate::core::{AppError, Column, DataType, Result};
use crate::storage::TableSchema;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use columns::*;

pub const BRANCH_STATUSES: &[&str] = &["Active", "Inactive"];
pub const GENDERS: &[&str] = &["Male", "Female"];
pub const MEMBER_STATUSES: &[&str] = &["Adult", "Child"];
pub const STAFF_ROLES: &[&str] = &["PCF Pastor", "Head of Departments", "Cell Leader", "Worker"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Branch,
    Member,
    Staff,
    MeetingDay,
    ServiceReport,
    CellReport,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        Self::Branch,
        Self::Member,
        Self::Staff,
        Self::MeetingDay,
        Self::ServiceReport,
        Self::CellReport,
    ];

    /// Durable table name, also used in URLs.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Branch => "branches",
            Self::Member => "members",
            Self::Staff => "staff",
            Self::MeetingDay => "meeting_days",
            Self::ServiceReport => "service_reports",
            Self::CellReport => "cell_reports",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Branch => "Branches",
            Self::Member => "Members",
            Self::Staff => "Staff & Roles",
            Self::MeetingDay => "Meeting Days",
            Self::ServiceReport => "Service Reports",
            Self::CellReport => "Cell Reports",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.table_name() == s)
            .ok_or_else(|| AppError::UnknownEntity(s.to_string()))
    }
}

lazy_static! {
    static ref REGISTRY: SchemaRegistry = SchemaRegistry::build();
}

pub struct SchemaRegistry {
    schemas: HashMap<EntityType, TableSchema>,
}

impl SchemaRegistry {
    pub fn global() -> &'static SchemaRegistry {
        &REGISTRY
    }

    /// Shorthand for `SchemaRegistry::global().get(entity)`.
    pub fn schema(entity: EntityType) -> &'static TableSchema {
        Self::global().get(entity)
    }

    pub fn get(&self, entity: EntityType) -> &TableSchema {
        // Every variant is registered in `build`.
        &self.schemas[&entity]
    }

    pub fn date_columns(&self, entity: EntityType) -> Vec<&str> {
        self.get(entity).schema().date_columns()
    }

    fn build() -> Self {
        let mut schemas = HashMap::new();
        for entity in EntityType::ALL {
            schemas.insert(entity, TableSchema::new(entity.table_name(), columns_for(entity)));
        }
        Self { schemas }
    }
}

fn columns_for(entity: EntityType) -> Vec<Column> {
    match entity {
        EntityType::Branch => vec![
            Column::new(BRANCH_NAME, DataType::Text),
            Column::new(BRANCH_LOCATION, DataType::Text),
            Column::new(TOTAL_CELL_VENUES, DataType::Integer),
            Column::new(BRANCH_STATUS, DataType::Text).one_of(BRANCH_STATUSES),
        ],
        EntityType::Member => vec![
            Column::new(MEMBER_NAME, DataType::Text),
            Column::new(DATE_OF_BIRTH, DataType::Date),
            Column::new(EMAIL, DataType::Text),
            Column::new(PHONE, DataType::Text),
            Column::new(GENDER, DataType::Text).one_of(GENDERS),
            Column::new(STATUS, DataType::Text).one_of(MEMBER_STATUSES),
        ],
        EntityType::Staff => vec![
            Column::new(STAFF_NAME, DataType::Text),
            Column::new(EMAIL, DataType::Text),
            Column::new(PHONE, DataType::Text),
            Column::new(PCF, DataType::Text),
            Column::new(ROLE, DataType::Text).one_of(STAFF_ROLES),
        ],
        EntityType::MeetingDay => vec![Column::new(MEETING_DAY, DataType::Text)],
        EntityType::ServiceReport => vec![
            Column::new(MEETING_DAY, DataType::Text),
            Column::new(TOTAL_ATTENDANCE, DataType::Integer),
            Column::new(MALE_ATTENDANCE, DataType::Integer),
            Column::new(FEMALE_ATTENDANCE, DataType::Integer),
            Column::new(NEW_CONVERTS, DataType::Integer),
            Column::new(FIRST_TIMERS, DataType::Integer),
            Column::new(DATE_OF_MEETING, DataType::Date),
        ],
        EntityType::CellReport => vec![
            Column::new(BRANCH_NAME, DataType::Text),
            Column::new(PCF_PASTOR, DataType::Text),
            Column::new(CELL_LEADER, DataType::Text),
            Column::new(TOTAL_ATTENDANCE, DataType::Integer),
            Column::new(NEW_CONVERTS, DataType::Integer),
            Column::new(FIRST_TIMERS, DataType::Integer),
            Column::new(SUNDAY_SERVICE_ATTENDANCE, DataType::Integer),
            Column::new(TOTAL_OFFERING, DataType::Decimal),
            Column::new(DATE_OF_MEETING, DataType::Date),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_registered() {
        let registry = SchemaRegistry::global();
        for entity in EntityType::ALL {
            let schema = registry.get(entity);
            assert_eq!(schema.name(), entity.table_name());
            assert!(schema.schema().column_count() > 0);
        }
    }

    #[test]
    fn test_branch_layout() {
        let schema = SchemaRegistry::schema(EntityType::Branch).schema();
        assert_eq!(
            schema.column_names(),
            vec![BRANCH_NAME, BRANCH_LOCATION, TOTAL_CELL_VENUES, BRANCH_STATUS]
        );
        assert_eq!(schema.get_column(BRANCH_STATUS).unwrap().choices, BRANCH_STATUSES);
    }

    #[test]
    fn test_date_columns() {
        let registry = SchemaRegistry::global();
        assert_eq!(registry.date_columns(EntityType::Member), vec![DATE_OF_BIRTH]);
        assert_eq!(registry.date_columns(EntityType::CellReport), vec![DATE_OF_MEETING]);
        assert!(registry.date_columns(EntityType::Staff).is_empty());
    }

    #[test]
    fn test_entity_from_table_name() {
        assert_eq!("cell_reports".parse::<EntityType>().unwrap(), EntityType::CellReport);
        assert_eq!(
            "pastors".parse::<EntityType>().unwrap_err(),
            AppError::UnknownEntity("pastors".into())
        );
    }
}
