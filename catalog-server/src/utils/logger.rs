//! Logging Infrastructure
//!
//! Console output (pretty in development, JSON in production) plus, when
//! `LOG_DIR` is set:
//! - `LOG_DIR/catalog.YYYY-MM-DD.log`: application logs, removed after
//!   [`LOG_RETENTION_DAYS`] by a background sweep
//! - `LOG_DIR/audit/audit.YYYY-MM-DD.log`: events with target `audit`, never deleted

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Rotated file name prefix: `catalog.YYYY-MM-DD.log`
const LOG_FILE_PREFIX: &str = "catalog";
const LOG_FILE_SUFFIX: &str = "log";

/// Target routed to the permanent audit file
pub const AUDIT_TARGET: &str = "audit";

/// Days a rotated log file is kept
pub const LOG_RETENTION_DAYS: i64 = 14;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Date embedded in a rotated file name, if it is one of ours
fn rotated_file_date(name: &str) -> Option<chrono::NaiveDate> {
    let date = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_FILE_SUFFIX)?
        .strip_suffix('.')?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Delete rotated log files older than `retain_days`
pub fn cleanup_old_logs(log_dir: &Path, retain_days: i64) -> anyhow::Result<usize> {
    let cutoff = chrono::Utc::now().date_naive() - chrono::Duration::days(retain_days);
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = rotated_file_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides `level` when set.
///
/// ```no_run
/// // Development (console only)
/// catalog_server::init_logger_with_file("debug", false, None)?;
///
/// // Production (JSON console + rotating file)
/// catalog_server::init_logger_with_file("info", true, Some("./data/logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let Some(dir) = log_dir else {
        subscriber.with(console_layer).try_init()?;
        return Ok(());
    };

    let log_dir = Path::new(dir);
    fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)?;

    let file_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(appender))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(appender))
            .boxed()
    };
    let file_layer = file_layer.with_filter(filter_fn(|meta| meta.target() != AUDIT_TARGET));

    // Permanent audit trail, outside the retention sweep
    let audit_dir = log_dir.join("audit");
    fs::create_dir_all(&audit_dir)?;
    let audit_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(AUDIT_TARGET)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&audit_dir)?;
    let audit_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::sync::Mutex::new(audit_appender))
        .with_filter(filter_fn(|meta| meta.target() == AUDIT_TARGET));

    subscriber
        .with(console_layer)
        .with(file_layer)
        .with(audit_layer)
        .try_init()?;

    Ok(())
}

/// Hourly sweep of rotated files until `shutdown` fires
///
/// Registered with `BackgroundTasks` when `LOG_DIR` is set. The first sweep
/// runs immediately.
pub async fn periodic_cleanup(log_dir: PathBuf, shutdown: CancellationToken) {
    loop {
        if let Err(e) = cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS) {
            tracing::warn!("Log cleanup failed: {e}");
        }
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(CLEANUP_INTERVAL) => {}
        }
    }
    tracing::debug!("Log cleanup stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_file_date() {
        assert_eq!(
            rotated_file_date("catalog.2024-02-29.log"),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(rotated_file_date("catalog.log"), None);
        assert_eq!(rotated_file_date("other.2024-02-29.log"), None);
        assert_eq!(rotated_file_date("catalog.2024-13-01.log"), None);
    }

    #[test]
    fn test_cleanup_keeps_recent_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::Utc::now().date_naive();
        let old = today - chrono::Duration::days(LOG_RETENTION_DAYS + 1);

        let old_file = dir.path().join(format!("catalog.{}.log", old.format("%Y-%m-%d")));
        let new_file = dir.path().join(format!("catalog.{}.log", today.format("%Y-%m-%d")));
        let foreign = dir.path().join("notes.txt");
        for path in [&old_file, &new_file, &foreign] {
            fs::write(path, b"x").unwrap();
        }

        let removed = cleanup_old_logs(dir.path(), LOG_RETENTION_DAYS).unwrap();
        assert_eq!(removed, 1);
        assert!(!old_file.exists());
        assert!(new_file.exists());
        assert!(foreign.exists());
    }

    #[tokio::test]
    async fn test_periodic_cleanup_sweeps_and_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let old = chrono::Utc::now().date_naive() - chrono::Duration::days(LOG_RETENTION_DAYS + 3);
        let old_file = dir.path().join(format!("catalog.{}.log", old.format("%Y-%m-%d")));
        fs::write(&old_file, b"x").unwrap();

        let mut tasks = crate::core::BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn("log_cleanup", periodic_cleanup(dir.path().to_path_buf(), token));
        assert_eq!(tasks.len(), 1);

        // Cancelled before the hourly sleep elapses; the first sweep still runs
        tokio::time::timeout(Duration::from_secs(5), tasks.shutdown(Duration::from_secs(2)))
            .await
            .unwrap();
        assert!(!old_file.exists());
    }
}
