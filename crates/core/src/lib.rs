pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AppConfig, LogSinkConfig, MetricsConfig, QueryLogFormat};
pub use errors::*;
pub use logging::{init_logging, LogConfig, LogLevel, OutputFormat};

/// 统一的Result类型
pub type MetricsResult<T> = std::result::Result<T, MetricsError>;
