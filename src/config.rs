use crate::storage::DurabilityMode;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "churchdb-data";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Server configuration
///
/// Parsed from the command line; the data directory may also come from
/// `CHURCHDB_DATA_DIR`.
#[derive(Debug, Clone, Parser)]
#[command(name = "churchdb", version, about = "Church administration records server")]
pub struct AppConfig {
    /// Directory holding one table file per entity
    #[arg(long, env = "CHURCHDB_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Address the HTTP server listens on
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: SocketAddr,

    /// `sync` fsyncs every insert, `async` only flushes
    #[arg(long, default_value = "sync")]
    pub durability: DurabilityMode,

    /// Keep records in memory only; nothing is written to disk
    #[arg(long)]
    pub in_memory: bool,

    /// Look-ahead window for upcoming birthdays
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    pub birthday_horizon_days: u32,

    /// Look-ahead window for upcoming meeting days
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    pub meeting_horizon_days: u32,
}

impl AppConfig {
    /// Create a configuration with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            durability: DurabilityMode::default(),
            in_memory: false,
            birthday_horizon_days: DEFAULT_HORIZON_DAYS,
            meeting_horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Flush-only writes, for tests that do not need fsync
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir).durability(DurabilityMode::Async)
    }

    /// Set the bind address
    pub fn bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Set the durability mode
    pub fn durability(mut self, durability: DurabilityMode) -> Self {
        self.durability = durability;
        self
    }

    /// Use the non-durable in-memory store
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Set the birthday look-ahead window
    pub fn birthday_horizon_days(mut self, days: u32) -> Self {
        self.birthday_horizon_days = days;
        self
    }

    /// Set the meeting-day look-ahead window
    pub fn meeting_horizon_days(mut self, days: u32) -> Self {
        self.meeting_horizon_days = days;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
