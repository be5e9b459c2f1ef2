use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("Column '{0}' not found in table '{1}'")]
    UnknownColumn(String, String),

    #[error("Table '{0}' has not been hydrated")]
    NotHydrated(String),
}

impl AppError {
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    pub fn store_unavailable(context: &str, err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(format!("{}: {}", context, err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
