use crate::core::AppError;
use crate::views::{DataPoint, OptionList, UpcomingDate};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// How the reports page groups service reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFilter {
    /// Attendance per meeting day.
    #[default]
    Service,
    /// Attendance per calendar month.
    Monthly,
    /// Totals over every report.
    Global,
}

impl FromStr for ReportFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "service" => Ok(Self::Service),
            "monthly" => Ok(Self::Monthly),
            "global" => Ok(Self::Global),
            other => Err(AppError::SchemaMismatch(format!(
                "report filter must be service|monthly|global, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => write!(f, "service"),
            Self::Monthly => write!(f, "monthly"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Everything the landing page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub totals: Vec<DataPoint>,
    pub attendance: Vec<DataPoint>,
    pub upcoming_meeting_days: Vec<UpcomingDate>,
    pub upcoming_birthdays: Vec<UpcomingDate>,
}

/// Dropdown choices for one form column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOptions {
    pub column: String,
    pub options: OptionList,
}

impl FieldOptions {
    pub fn new(column: impl Into<String>, options: OptionList) -> Self {
        Self {
            column: column.into(),
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub name: String,
    pub column_count: usize,
    pub row_count: usize,
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table '{}': {} columns, {} rows",
            self.name, self.column_count, self.row_count
        )
    }
}
