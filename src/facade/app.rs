use super::reports::{Dashboard, FieldOptions, ReportFilter, TableStats};
use crate::cache::EntityCache;
use crate::config::{AppConfig, DEFAULT_HORIZON_DAYS};
use crate::core::{Result, Row, Value};
use crate::records::{self, Member, Record};
use crate::result::TableView;
use crate::schema::columns::*;
use crate::schema::{EntityType, SchemaRegistry, STAFF_ROLES};
use crate::storage::{DurableStore, FileStore, InMemoryStore, Table};
use crate::views::{self, DataPoint, OptionList};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

/// The application core: one durable store plus the cache mirroring it.
///
/// Constructed once at startup with [`ChurchApp::init`]; every read goes to
/// the cache, every write goes to the store first and the cache second.
pub struct ChurchApp {
    store: Box<dyn DurableStore>,
    cache: EntityCache,
    birthday_horizon_days: u32,
    meeting_horizon_days: u32,
}

impl ChurchApp {
    /// Creates every table in `store` and hydrates the cache from it.
    pub fn init(mut store: Box<dyn DurableStore>) -> Result<Self> {
        for entity in EntityType::ALL {
            store.ensure_table(entity)?;
        }
        let mut cache = EntityCache::new();
        cache.init(store.as_ref())?;

        Ok(Self {
            store,
            cache,
            birthday_horizon_days: DEFAULT_HORIZON_DAYS,
            meeting_horizon_days: DEFAULT_HORIZON_DAYS,
        })
    }

    /// Opens the store described by `config` and initializes the app on it.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let store: Box<dyn DurableStore> = if config.in_memory {
            info!("using in-memory store; records will not survive a restart");
            Box::new(InMemoryStore::new())
        } else {
            Box::new(FileStore::open(&config.data_dir, config.durability)?)
        };
        Ok(Self::init(store)?.with_horizons(config.birthday_horizon_days, config.meeting_horizon_days))
    }

    pub fn with_horizons(mut self, birthday_days: u32, meeting_days: u32) -> Self {
        self.birthday_horizon_days = birthday_days;
        self.meeting_horizon_days = meeting_days;
        self
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Validates raw form values and records them.
    ///
    /// Fails with `SchemaMismatch` when the values do not fit the entity's
    /// schema; the store and the cache are then left untouched.
    pub fn submit_record(&mut self, entity: EntityType, fields: &[String]) -> Result<()> {
        let row = records::coerce_fields(entity, fields)?;
        self.commit(entity, row)
    }

    /// Records an already typed record.
    pub fn add<R: Record>(&mut self, record: &R) -> Result<()> {
        self.commit(R::ENTITY, record.to_row())
    }

    fn commit(&mut self, entity: EntityType, row: Row) -> Result<()> {
        let schema = SchemaRegistry::schema(entity).schema();
        schema.validate_row(&row)?;

        // Store first: a failed write must never show up in the cache.
        if let Err(err) = self.store.insert(entity, schema.encode_row(&row)) {
            warn!(table = %entity, error = %err, "record not saved");
            return Err(err);
        }
        self.cache.append(entity, row)?;
        info!(table = %entity, rows = self.cache.row_count(entity), "record saved");
        Ok(())
    }

    /// Re-hydrates every cached table from the store.
    pub fn reload(&mut self) -> Result<()> {
        for entity in EntityType::ALL {
            self.cache.refresh(entity, self.store.as_ref())?;
        }
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn snapshot(&self, entity: EntityType) -> Result<&Table> {
        self.cache.snapshot(entity)
    }

    pub fn records<R: Record>(&self) -> Result<Vec<R>> {
        self.snapshot(R::ENTITY)?
            .rows()
            .iter()
            .map(|row| R::from_row(row))
            .collect()
    }

    pub fn table_stats(&self, entity: EntityType) -> Result<TableStats> {
        let table = self.snapshot(entity)?;
        Ok(TableStats {
            name: entity.table_name().to_string(),
            column_count: table.schema().schema().column_count(),
            row_count: table.row_count(),
        })
    }

    /// Summary metrics shown above an entity's form, in display order.
    pub fn render_summary(&self, entity: EntityType) -> Result<Vec<DataPoint>> {
        let table = self.snapshot(entity)?;
        let total = table.row_count() as i64;

        let summary = match entity {
            EntityType::Branch => {
                let staff = self.snapshot(EntityType::Staff)?;
                vec![
                    DataPoint::new("Total Branches", total),
                    DataPoint::new("Total Branch Pastors", count_of(staff, ROLE, "PCF Pastor")?),
                    DataPoint::new("Total Cell Venues", views::numeric_sum(table, TOTAL_CELL_VENUES)?),
                    DataPoint::new("Total Cell Leaders", count_of(staff, ROLE, "Cell Leader")?),
                ]
            }
            EntityType::Member => vec![
                DataPoint::new("Total Members", total),
                DataPoint::new("Total Men", count_of(table, GENDER, "Male")?),
                DataPoint::new("Total Women", count_of(table, GENDER, "Female")?),
                DataPoint::new("Total Children", count_of(table, STATUS, "Child")?),
            ],
            EntityType::Staff => {
                let mut summary = vec![DataPoint::new("Total Staff", total)];
                for (role, n) in views::category_counts(table, ROLE, STAFF_ROLES)? {
                    summary.push(DataPoint::new(role_metric_label(&role), n as i64));
                }
                summary
            }
            EntityType::MeetingDay => vec![DataPoint::new("Total Meeting Days", total)],
            EntityType::ServiceReport => vec![
                DataPoint::new("Total Reports", total),
                DataPoint::new("Total Attendance", views::numeric_sum(table, TOTAL_ATTENDANCE)?),
                DataPoint::new("New Converts", views::numeric_sum(table, NEW_CONVERTS)?),
                DataPoint::new("First Timers", views::numeric_sum(table, FIRST_TIMERS)?),
            ],
            EntityType::CellReport => vec![
                DataPoint::new("Total Cell Reports", total),
                DataPoint::new("Total Attendance", views::numeric_sum(table, TOTAL_ATTENDANCE)?),
                DataPoint::new("Total Offering", views::numeric_sum(table, TOTAL_OFFERING)?),
                DataPoint::new("New Converts", views::numeric_sum(table, NEW_CONVERTS)?),
            ],
        };
        Ok(summary)
    }

    /// The entity's records as of today.
    pub fn render_table(&self, entity: EntityType) -> Result<TableView> {
        self.render_table_at(entity, today())
    }

    /// The entity's records in insertion order. The members table gains a
    /// computed `Age` column relative to `today`.
    pub fn render_table_at(&self, entity: EntityType, today: NaiveDate) -> Result<TableView> {
        let table = self.snapshot(entity)?;
        let mut columns = table.column_names();
        let mut rows = table.rows().to_vec();

        if entity == EntityType::Member {
            columns.push("Age".to_string());
            for row in &mut rows {
                let age = Member::from_row(row)?.age_on(today);
                row.push(Value::from(age));
            }
        }
        Ok(TableView::new(entity.label(), columns, rows))
    }

    /// Total attendance per meeting day, for the dashboard line chart.
    pub fn render_chart(&self) -> Result<Vec<DataPoint>> {
        views::attendance_by_meeting_day(self.snapshot(EntityType::ServiceReport)?)
    }

    pub fn report_summary(&self, filter: ReportFilter) -> Result<Vec<DataPoint>> {
        let reports = self.snapshot(EntityType::ServiceReport)?;
        match filter {
            ReportFilter::Service => views::attendance_by_meeting_day(reports),
            ReportFilter::Monthly => views::monthly_sum(reports, DATE_OF_MEETING, TOTAL_ATTENDANCE),
            ReportFilter::Global => views::column_totals(reports),
        }
    }

    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        Ok(Dashboard {
            today,
            totals: vec![
                DataPoint::new("Total Branches", self.cache.row_count(EntityType::Branch) as i64),
                DataPoint::new("Total Staff", self.cache.row_count(EntityType::Staff) as i64),
                DataPoint::new("Total Members", self.cache.row_count(EntityType::Member) as i64),
            ],
            attendance: self.render_chart()?,
            upcoming_meeting_days: views::upcoming_meeting_days(
                self.snapshot(EntityType::MeetingDay)?,
                today,
                self.meeting_horizon_days,
            )?,
            upcoming_birthdays: views::upcoming_birthdays(
                self.snapshot(EntityType::Member)?,
                today,
                self.birthday_horizon_days,
            )?,
        })
    }

    /// Staff names holding exactly `role`; may be empty.
    pub fn staff_with_role(&self, role: &str) -> Result<OptionList> {
        views::role_options(self.snapshot(EntityType::Staff)?, role)
    }

    pub fn has_meeting_day(&self, name: &str) -> Result<bool> {
        let days = self.snapshot(EntityType::MeetingDay)?;
        Ok(days.column_values(MEETING_DAY)?.any(|v| v.as_str() == Some(name.trim())))
    }

    /// Dropdown choices for the entity's form: fixed enum choices from the
    /// registry plus choices derived from other tables.
    pub fn form_options(&self, entity: EntityType) -> Result<Vec<FieldOptions>> {
        let schema = SchemaRegistry::schema(entity).schema();
        let mut fields: Vec<FieldOptions> = schema
            .columns()
            .iter()
            .filter(|c| c.is_enum())
            .map(|c| FieldOptions::new(c.name.clone(), OptionList::new(c.choices.clone())))
            .collect();

        match entity {
            EntityType::ServiceReport => {
                let days = self.snapshot(EntityType::MeetingDay)?;
                fields.push(FieldOptions::new(MEETING_DAY, views::distinct_values(days, MEETING_DAY)?));
            }
            EntityType::CellReport => {
                let branches = self.snapshot(EntityType::Branch)?;
                fields.push(FieldOptions::new(BRANCH_NAME, views::distinct_values(branches, BRANCH_NAME)?));
                fields.push(FieldOptions::new(PCF_PASTOR, self.staff_with_role("PCF Pastor")?));
                fields.push(FieldOptions::new(CELL_LEADER, self.staff_with_role("Cell Leader")?));
            }
            _ => {}
        }
        Ok(fields)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn role_metric_label(role: &str) -> String {
    match role {
        "Head of Departments" => "Total Head of Departments".to_string(),
        other => format!("Total {}s", other),
    }
}

fn count_of(table: &Table, column: &str, category: &str) -> Result<i64> {
    let counts = views::category_counts(table, column, &[category])?;
    Ok(counts.first().map_or(0, |(_, n)| *n as i64))
}
