use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::fmt;
use std::fs;
use std::path::Path;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "node-lifecycle.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Target used for structured lifecycle events (termination, disposal failures, retention).
pub const LIFECYCLE_TARGET: &str = "lifecycle";

/// Initializes the global logger.
///
/// Call once at process start. The level is read from `RUST_LOG` and defaults to `info`.
/// Output goes to stderr (colored) and to `logs/node-lifecycle.log`. When the file cannot be
/// opened only stderr is used.
pub fn init() {
    let log_file_path = Path::new(LOG_DIR).join(LOG_FILE);
    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        eprintln!("Failed to create log directory at '{}': {}", LOG_DIR, e);
    }

    let level = level_filter(std::env::var("RUST_LOG").ok().as_deref());
    let mut dispatch = Dispatch::new().level(level).level_for("serde", LevelFilter::Warn).chain(console_dispatch());

    match fern::log_file(&log_file_path) {
        Ok(file) => {
            dispatch = dispatch.chain(Dispatch::new().format(|out, message, record| write_line(out, message, record, &record.level())).chain(file));
        }
        Err(e) => eprintln!("Failed to open log file '{}': {}", log_file_path.display(), e),
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    log::info!("Logger initialized. Lifecycle events are logged under target '{}'.", LIFECYCLE_TARGET);
}

fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| write_line(out, message, record, &colors.color(record.level())))
        .chain(std::io::stderr())
}

fn write_line(out: FormatCallback, message: &fmt::Arguments, record: &Record, level: &dyn fmt::Display) {
    out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), level, record.target(), message))
}

/// Unset or unparsable levels fall back to `info`.
fn level_filter(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(LevelFilter::Info)
}
