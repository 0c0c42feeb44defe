use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use rand::Rng;
use tracing::{error, info, warn};

use tsd_metrics_aggregator::{Metrics, MetricsFactory, TsdMetricsFactory};
use tsd_metrics_core::{init_logging, AppConfig, LogLevel, OutputFormat};
use tsd_metrics_domain::units::{BYTE, MILLISECOND};

/// 模拟工作负载并输出查询日志
#[derive(Parser, Debug)]
#[command(name = "tsd-metrics")]
#[command(version = "1.0.0")]
#[command(about = "Per-unit-of-work metrics client - 模拟工作单元并写入查询日志")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// 日志级别 (覆盖配置文件)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// 日志格式: json, text, pretty
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<OutputFormat>,

    /// 模拟的工作单元数量
    #[arg(short = 'n', long, default_value_t = 10)]
    units_of_work: usize,

    /// 同时运行的工作单元数量
    #[arg(short = 'j', long, default_value_t = 4)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = AppConfig::load(cli.config.as_deref())
        .with_context(|| format!("加载配置失败: {:?}", cli.config))?;
    // 优先级: 命令行 > LOG_LEVEL/LOG_FORMAT > 配置文件
    config.logging = config.logging.with_env_overrides();
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    // 初始化日志系统
    init_logging(&config.logging).context("初始化日志系统失败")?;

    let factory = Arc::new(TsdMetricsFactory::from_app_config(&config));
    if factory.is_degraded() {
        warn!(reasons = ?factory.failures(), "Metrics disabled; events will not be recorded");
    }

    info!(
        units_of_work = cli.units_of_work,
        concurrency = cli.concurrency,
        directory = %config.sink.directory,
        "Starting simulated workload"
    );

    stream::iter(0..cli.units_of_work)
        .for_each_concurrent(cli.concurrency.max(1), |unit| {
            let factory = Arc::clone(&factory);
            async move {
                let handle = tokio::spawn(run_unit_of_work(factory, unit));
                if let Err(e) = handle.await {
                    error!(unit, "Unit of work failed: {}", e);
                }
            }
        })
        .await;

    info!("Simulated workload complete");
    Ok(())
}

async fn run_unit_of_work(factory: Arc<TsdMetricsFactory>, unit: usize) {
    let (work_ms, lookups, payload, fail) = {
        let mut rng = rand::rng();
        (
            rng.random_range(5..50u64),
            rng.random_range(1..5usize),
            rng.random_range(128..4096i64),
            rng.random_bool(0.1),
        )
    };

    let metrics = factory.create();
    metrics.add_annotation("unit", &unit.to_string());
    metrics.start_timer("request");

    for _ in 0..lookups {
        let lookup = metrics.create_timer("lookup");
        tokio::time::sleep(Duration::from_millis(work_ms / lookups as u64)).await;
        metrics.increment_counter("lookups");
        if fail {
            lookup.abort();
        } else {
            lookup.stop();
        }
    }

    if fail {
        metrics.increment_counter("errors");
    } else {
        metrics.create_counter("errors");
    }
    metrics.set_gauge_i64("payload", payload, Some(BYTE));
    metrics.set_timer("think", work_ms as i64, MILLISECOND);
    metrics.stop_timer("request");

    // Sink I/O is blocking.
    if let Err(e) = tokio::task::spawn_blocking(move || metrics.close()).await {
        error!(unit, "Failed to close metrics: {}", e);
    }
}
