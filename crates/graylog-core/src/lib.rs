pub mod error;
pub mod id;
pub mod time;
pub mod value;

pub use error::{BoxError, ErrorCategory, GraylogError, Result};
pub use id::{require, validate_id};
pub use time::GraylogTimestamp;
pub use value::{coerce_all, coerce_to_json, ConfigMap, ConfigValue, DeclaredConfig};
