use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use tsd_metrics_core::{LogSinkConfig, MetricsResult};

/// Rotation period label, one file per hour.
const PERIOD_FORMAT: &str = "%Y-%m-%d-%H";
const PERIOD_LEN: usize = "YYYY-MM-DD-HH".len();

/// 日志轮转配置
#[derive(Debug, Clone)]
pub struct LogRotationConfig {
    pub directory: PathBuf,
    pub name: String,
    pub extension: String,
    /// 保留的日志文件数量
    pub max_history: usize,
}

impl From<&LogSinkConfig> for LogRotationConfig {
    fn from(config: &LogSinkConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            name: config.name.clone(),
            extension: config.extension.clone(),
            max_history: config.max_history,
        }
    }
}

impl LogRotationConfig {
    /// `<directory>/<name><extension>`
    pub fn active_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.name, self.extension))
    }

    /// `<directory>/<name>.<period><extension>`
    pub fn rotated_path(&self, period: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}{}", self.name, period, self.extension))
    }

    /// Ordering key of a rotated file: its period and the collision counter
    /// (0 when the name carries none). `None` for any other file.
    fn rotated_key(&self, file_name: &str) -> Option<(NaiveDateTime, u32)> {
        let label = file_name
            .strip_prefix(self.name.as_str())?
            .strip_prefix('.')?
            .strip_suffix(self.extension.as_str())?;

        let (period, attempt) = match label.split_once('.') {
            Some((period, attempt)) => (period, attempt.parse::<u32>().ok()?),
            None => (label, 0),
        };

        if period.len() != PERIOD_LEN {
            return None;
        }
        let period =
            NaiveDateTime::parse_from_str(&format!("{period}-00"), "%Y-%m-%d-%H-%M").ok()?;
        Some((period, attempt))
    }
}

struct ActiveFile {
    writer: BufWriter<File>,
    period: String,
}

/// Appends lines to the active file and rolls it over hourly.
pub struct RollingFileWriter {
    config: LogRotationConfig,
    current: Mutex<Option<ActiveFile>>,
}

impl RollingFileWriter {
    pub fn new(config: LogRotationConfig) -> MetricsResult<Self> {
        fs::create_dir_all(&config.directory)?;

        Ok(Self {
            config,
            current: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &LogRotationConfig {
        &self.config
    }

    pub fn write_line(&self, line: &str) -> MetricsResult<()> {
        self.write_line_at(line, Utc::now())
    }

    pub fn write_line_at(&self, line: &str, now: DateTime<Utc>) -> MetricsResult<()> {
        let period = now.format(PERIOD_FORMAT).to_string();
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        let needs_open = match current.as_ref() {
            Some(active) if active.period == period => false,
            Some(_) => {
                if let Some(previous) = current.take() {
                    self.rotate(previous)?;
                }
                true
            }
            None => true,
        };

        if needs_open {
            *current = Some(self.open(&period)?);
        }

        if let Some(active) = current.as_mut() {
            active.writer.write_all(line.as_bytes())?;
            active.writer.write_all(b"\n")?;
            active.writer.flush()?;
        }

        Ok(())
    }

    pub fn flush(&self) -> MetricsResult<()> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = current.as_mut() {
            active.writer.flush()?;
        }
        Ok(())
    }

    /// Opens the active file, first rolling over a leftover file from an
    /// earlier period.
    fn open(&self, period: &str) -> MetricsResult<ActiveFile> {
        let path = self.config.active_path();

        if let Some(leftover) = file_period(&path) {
            if leftover != period {
                self.rename_to_rotated(&path, &leftover)?;
                self.prune()?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!("Opened query log file: {:?}", path);

        Ok(ActiveFile {
            writer: BufWriter::new(file),
            period: period.to_string(),
        })
    }

    fn rotate(&self, mut previous: ActiveFile) -> MetricsResult<()> {
        previous.writer.flush()?;
        drop(previous.writer);

        self.rename_to_rotated(&self.config.active_path(), &previous.period)?;
        self.prune()
    }

    fn rename_to_rotated(&self, active: &Path, period: &str) -> MetricsResult<()> {
        let mut target = self.config.rotated_path(period);
        let mut attempt = 1;
        while target.exists() {
            target = self
                .config
                .rotated_path(&format!("{period}.{attempt}"));
            attempt += 1;
        }

        fs::rename(active, &target)?;
        info!("Rotated query log file to: {:?}", target);
        Ok(())
    }

    /// 清理旧的日志文件
    fn prune(&self) -> MetricsResult<()> {
        let mut rotated: Vec<((NaiveDateTime, u32), PathBuf)> =
            fs::read_dir(&self.config.directory)?
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    let key = self.config.rotated_key(entry.file_name().to_str()?)?;
                    Some((key, entry.path()))
                })
                .collect();

        if rotated.len() <= self.config.max_history {
            return Ok(());
        }

        // Oldest first; a collision suffix is newer than the plain period name.
        rotated.sort_by(|a, b| a.0.cmp(&b.0));
        let excess = rotated.len() - self.config.max_history;
        for (_, path) in rotated.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to remove old query log file {:?}: {}", path, e);
            } else {
                debug!("Removed old query log file: {:?}", path);
            }
        }

        Ok(())
    }
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to flush query log on drop: {}", e);
        }
    }
}

fn file_period(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let modified: DateTime<Utc> = modified.into();
    Some(modified.format(PERIOD_FORMAT).to_string())
}
