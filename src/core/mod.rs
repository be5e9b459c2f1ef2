pub mod error;
pub mod types;
pub mod value;

pub use error::{AppError, Result};
pub use types::{Column, Row, Schema, parse_date};
pub use value::{DATE_FORMAT, DataType, Value};
