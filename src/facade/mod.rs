pub mod app;
pub mod reports;

pub use app::{ChurchApp, today};
pub use reports::{Dashboard, FieldOptions, ReportFilter, TableStats};
