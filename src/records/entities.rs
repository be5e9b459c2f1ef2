use super::{BranchStatus, Gender, MemberStatus, Record, StaffRole};
use super::{arity, choice, count, date, decimal, text};
use crate::core::{Result, Row, Value, parse_date};
use crate::schema::EntityType;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub location: String,
    pub cell_venues: u32,
    pub status: BranchStatus,
}

impl Record for Branch {
    const ENTITY: EntityType = EntityType::Branch;

    fn to_row(&self) -> Row {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.location.as_str()),
            Value::from(self.cell_venues),
            Value::from(self.status.as_str()),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        arity::<Self>(row)?;
        let e = Self::ENTITY;
        Ok(Self {
            name: text(e, row, 0)?,
            location: text(e, row, 1)?,
            cell_venues: count(e, row, 2)?,
            status: choice(e, row, 3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub status: MemberStatus,
}

impl Member {
    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.date_of_birth).unwrap_or(0)
    }

    /// The birthday's occurrence in `year`.
    ///
    /// A 29 February birthday falls on 28 February in common years.
    pub fn birthday_in(&self, year: i32) -> Option<NaiveDate> {
        self.date_of_birth.with_year(year).or_else(|| {
            NaiveDate::from_ymd_opt(year, self.date_of_birth.month(), 28)
        })
    }
}

impl Record for Member {
    const ENTITY: EntityType = EntityType::Member;

    fn to_row(&self) -> Row {
        vec![
            Value::from(self.name.as_str()),
            Value::Date(self.date_of_birth),
            Value::from(self.email.as_str()),
            Value::from(self.phone.as_str()),
            Value::from(self.gender.as_str()),
            Value::from(self.status.as_str()),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        arity::<Self>(row)?;
        let e = Self::ENTITY;
        Ok(Self {
            name: text(e, row, 0)?,
            date_of_birth: date(e, row, 1)?,
            email: text(e, row, 2)?,
            phone: text(e, row, 3)?,
            gender: choice(e, row, 4)?,
            status: choice(e, row, 5)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pcf: String,
    pub role: StaffRole,
}

impl Record for Staff {
    const ENTITY: EntityType = EntityType::Staff;

    fn to_row(&self) -> Row {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.email.as_str()),
            Value::from(self.phone.as_str()),
            Value::from(self.pcf.as_str()),
            Value::from(self.role.as_str()),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        arity::<Self>(row)?;
        let e = Self::ENTITY;
        Ok(Self {
            name: text(e, row, 0)?,
            email: text(e, row, 1)?,
            phone: text(e, row, 2)?,
            pcf: text(e, row, 3)?,
            role: choice(e, row, 4)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDay {
    pub name: String,
}

impl MeetingDay {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Next date on or after `today` this meeting takes place.
    ///
    /// A `YYYY-MM-DD` name is a one-off date; a weekday name ("Sunday",
    /// "wed") recurs weekly. Any other name has no computable occurrence.
    pub fn next_occurrence(&self, today: NaiveDate) -> Option<NaiveDate> {
        if let Some(d) = parse_date(&self.name) {
            return (d >= today).then_some(d);
        }
        let weekday = self.name.trim().parse::<Weekday>().ok()?;
        let ahead = (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
        today.checked_add_days(Days::new(u64::from(ahead)))
    }
}

impl Record for MeetingDay {
    const ENTITY: EntityType = EntityType::MeetingDay;

    fn to_row(&self) -> Row {
        vec![Value::from(self.name.as_str())]
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        arity::<Self>(row)?;
        Ok(Self { name: text(Self::ENTITY, row, 0)? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub meeting_day: String,
    pub total_attendance: u32,
    pub male_attendance: u32,
    pub female_attendance: u32,
    pub new_converts: u32,
    pub first_timers: u32,
    pub meeting_date: NaiveDate,
}

impl Record for ServiceReport {
    const ENTITY: EntityType = EntityType::ServiceReport;

    fn to_row(&self) -> Row {
        vec![
            Value::from(self.meeting_day.as_str()),
            Value::from(self.total_attendance),
            Value::from(self.male_attendance),
            Value::from(self.female_attendance),
            Value::from(self.new_converts),
            Value::from(self.first_timers),
            Value::Date(self.meeting_date),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        arity::<Self>(row)?;
        let e = Self::ENTITY;
        Ok(Self {
            meeting_day: text(e, row, 0)?,
            total_attendance: count(e, row, 1)?,
            male_attendance: count(e, row, 2)?,
            female_attendance: count(e, row, 3)?,
            new_converts: count(e, row, 4)?,
            first_timers: count(e, row, 5)?,
            meeting_date: date(e, row, 6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    pub branch_name: String,
    pub pcf_pastor: String,
    pub cell_leader: String,
    pub total_attendance: u32,
    pub new_converts: u32,
    pub first_timers: u32,
    pub sunday_service_attendance: u32,
    pub total_offering: f64,
    pub meeting_date: NaiveDate,
}

impl Record for CellReport {
    const ENTITY: EntityType = EntityType::CellReport;

    fn to_row(&self) -> Row {
        vec![
            Value::from(self.branch_name.as_str()),
            Value::from(self.pcf_pastor.as_str()),
            Value::from(self.cell_leader.as_str()),
            Value::from(self.total_attendance),
            Value::from(self.new_converts),
            Value::from(self.first_timers),
            Value::from(self.sunday_service_attendance),
            Value::Float(self.total_offering),
            Value::Date(self.meeting_date),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        arity::<Self>(row)?;
        let e = Self::ENTITY;
        Ok(Self {
            branch_name: text(e, row, 0)?,
            pcf_pastor: text(e, row, 1)?,
            cell_leader: text(e, row, 2)?,
            total_attendance: count(e, row, 3)?,
            new_converts: count(e, row, 4)?,
            first_timers: count(e, row, 5)?,
            sunday_service_attendance: count(e, row, 6)?,
            total_offering: decimal(e, row, 7)?,
            meeting_date: date(e, row, 8)?,
        })
    }
}
