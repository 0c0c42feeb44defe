pub mod log_rotation;
pub mod sinks;

pub use log_rotation::{LogRotationConfig, RollingFileWriter};
pub use sinks::*;
