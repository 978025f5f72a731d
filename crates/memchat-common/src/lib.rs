pub mod errors;

pub use errors::{ConfigError, MemchatError};

pub type Result<T> = std::result::Result<T, MemchatError>;
