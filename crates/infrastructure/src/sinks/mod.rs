pub mod query_log;
pub mod tsd_log_sink;
pub mod warning_sink;

pub use tsd_log_sink::TsdLogSink;
pub use warning_sink::WarningSink;
