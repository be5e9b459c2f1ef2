pub mod engine;
pub mod memory;
pub mod persistence;
pub mod table;

pub use engine::DurableStore;
pub use memory::InMemoryStore;
pub use persistence::{DurabilityMode, FileStore};
pub use table::{Table, TableSchema};
