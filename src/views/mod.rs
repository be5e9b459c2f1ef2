//! Derived views: pure functions over cache snapshots.
//!
//! Nothing here touches storage; every function takes a `&Table` and
//! returns freshly computed values.

mod aggregate;
mod calendar;
mod options;

pub use aggregate::{
    attendance_by_meeting_day, category_counts, column_totals, group_sum, monthly_sum,
    numeric_sum, value_counts,
};
pub use calendar::{UpcomingDate, upcoming_birthdays, upcoming_meeting_days};
pub use options::{OptionList, distinct_values, filter_names, role_options};

use crate::core::Value;

/// One labelled value of a summary or chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub label: String,
    pub value: Value,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
