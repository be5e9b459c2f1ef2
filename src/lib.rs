// ============================================================================
// ChurchDB Library
// ============================================================================

//! Record keeping for a church administration: branches, members, staff,
//! meeting days, service reports and cell reports.
//!
//! Records are appended to a durable store and mirrored in an in-memory
//! cache that serves every read.
//!
//! # Examples
//!
//! ```
//! use churchdb::{ChurchApp, EntityType, InMemoryStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = ChurchApp::init(Box::new(InMemoryStore::new()))?;
//!
//! let fields: Vec<String> = ["Central", "Ikeja", "12", "Active"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! app.submit_record(EntityType::Branch, &fields)?;
//!
//! let view = app.render_table(EntityType::Branch)?;
//! assert_eq!(view.row_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod facade;
pub mod records;
pub mod result;
pub mod schema;
pub mod storage;
pub mod views;
pub mod web;

// Re-export main types for convenience
pub use config::AppConfig;
pub use core::{AppError, DataType, Result, Value};
pub use facade::{ChurchApp, Dashboard, ReportFilter};
pub use result::TableView;
pub use schema::{EntityType, SchemaRegistry};
pub use storage::{DurabilityMode, DurableStore, FileStore, InMemoryStore};
