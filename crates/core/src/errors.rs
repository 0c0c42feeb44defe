use thiserror::Error;

/// 指标客户端错误类型定义
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Sink错误: {0}")]
    Sink(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for MetricsError {
    fn from(err: config::ConfigError) -> Self {
        MetricsError::Configuration(err.to_string())
    }
}

/// 统一的Result类型
pub type Result<T> = std::result::Result<T, MetricsError>;
