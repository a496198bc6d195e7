//! Logging bootstrap.
//!
//! Records go through the `log` facade to a `ConsoleLogger`: the browser
//! console on wasm32, stderr everywhere else.
//!
//! # Invariants
//! - Init is idempotent for the same level.
//! - Re-initialization with a different level is rejected.
//! - Initialization never panics.

use log::{info, Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<ConsoleLogger> = OnceCell::new();

/// `log` backend writing one line per record
#[derive(Debug)]
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    fn format(record: &Record) -> String {
        format!("[{}] {}: {}", record.level(), record.target(), record.args())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_line(record.level(), &Self::format(record));
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(line);
    match level {
        Level::Error => console::error_1(&line),
        Level::Warn => console::warn_1(&line),
        Level::Info => console::info_1(&line),
        Level::Debug | Level::Trace => console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Parse a level name (`error`, `warn`, `info`, `debug`, `trace`, `off`)
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("unsupported log level `{}`", level))
}

/// Install the console logger at `level`.
///
/// # Errors
/// - `level` is not a known level name.
/// - Logging was already initialized with a different level.
/// - Another `log` backend was installed first.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = parse_level(level)?;

    if let Some(logger) = LOGGER.get() {
        return check_level(logger, level);
    }

    let mut installed = false;
    let logger = LOGGER.get_or_try_init(|| -> Result<ConsoleLogger, String> {
        installed = true;
        Ok(ConsoleLogger { level })
    })?;

    if installed {
        log::set_logger(logger).map_err(|e| format!("failed to install logger: {}", e))?;
        log::set_max_level(level);
        info!("logging initialized at {}", level);
    }

    check_level(logger, level)
}

/// Level of the installed logger, if any
pub fn logging_level() -> Option<LevelFilter> {
    LOGGER.get().map(|logger| logger.level)
}

fn check_level(logger: &ConsoleLogger, level: LevelFilter) -> Result<(), String> {
    if logger.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            logger.level, level
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info"), Ok(LevelFilter::Info));
        assert_eq!(parse_level(" WARN "), Ok(LevelFilter::Warn));
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn test_init_is_idempotent_and_rejects_switch() {
        // Only this test touches the global logger
        assert!(init_logging("debug").is_ok());
        assert!(init_logging("debug").is_ok());
        assert_eq!(logging_level(), Some(LevelFilter::Debug));
        assert!(init_logging("error").is_err());
        assert!(init_logging("nonsense").is_err());
    }

    #[test]
    fn test_enabled_follows_level() {
        let logger = ConsoleLogger { level: LevelFilter::Warn };
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }
}
