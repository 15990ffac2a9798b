//! Unified logging for tabtree.
//!
//! Routes every `log::info!()`/`log::warn!()`/... call to a debug log file at
//! `/tmp/tabtree_debug.log` on Unix, or `%TEMP%\tabtree_debug.log` on Windows.
//! Keeping output in a file leaves stdout clean for the CLI's own output.
//!
//! When `RUST_LOG` is set, lines are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the config file's
//! `log_level` (applied later through [`apply_config_log_level`]).

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tabtree_config::LogLevel;

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/tabtree_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("tabtree_debug.log");
    path
}

struct BridgeLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl BridgeLogger {
    fn new(mirror_stderr: bool) -> Self {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();

        let logger = Self {
            file: Mutex::new(file),
            mirror_stderr,
        };
        logger.write_line(&format!(
            "{}\ntabtree debug session started at {}\n{}\n",
            "=".repeat(80),
            timestamp(),
            "=".repeat(80)
        ));
        logger
    }

    fn write_line(&self, line: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            // Write failures are dropped
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }
}

impl log::Log for BridgeLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_line(&line);
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<BridgeLogger> = OnceLock::new();

/// Set when the CLI or `RUST_LOG` fixed the level, so config cannot override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Parse a `RUST_LOG` value. Only the level matters; `target=level`
/// directives use their level, and the most verbose directive wins.
fn parse_rust_log(value: &str) -> Option<log::LevelFilter> {
    value
        .split(',')
        .filter_map(|directive| directive.rsplit('=').next())
        .filter_map(LogLevel::from_name)
        .map(LogLevel::to_level_filter)
        .max()
}

/// Level fixed at startup, if any: the CLI flag first, then `RUST_LOG`.
fn startup_level(cli_level: Option<LogLevel>, rust_log: Option<&str>) -> Option<log::LevelFilter> {
    cli_level
        .map(LogLevel::to_level_filter)
        .or_else(|| rust_log.and_then(parse_rust_log))
}

/// Install the log bridge. Safe to call more than once; later calls are ignored.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let pinned = startup_level(cli_level, rust_log.as_deref());

    let logger = LOGGER.get_or_init(|| BridgeLogger::new(rust_log.is_some()));
    if log::set_logger(logger).is_err() {
        return;
    }

    match pinned {
        Some(level) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            log::set_max_level(level);
        }
        // Config decides later
        None => log::set_max_level(log::LevelFilter::Off),
    }
}

/// Apply the config file's level unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_log_level(level: LogLevel) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level.to_level_filter());
    }
}
