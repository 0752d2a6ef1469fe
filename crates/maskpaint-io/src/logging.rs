//! `log` backend writing to the browser console.
//!
//! `maskpaint-core` logs through the `log` facade; in the browser those
//! records end up here, split by level onto the matching `console`
//! method so the devtools level filter works.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// Forwards `log` records to `console.debug`/`info`/`warn`/`error`.
#[derive(Debug)]
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    /// A logger that passes records at or above `level`.
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(
            record.level(),
            record.target(),
            &record.args().to_string(),
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install a [`ConsoleLogger`] as the global logger.
///
/// Calling this more than once keeps the first logger.
pub fn init(level: LevelFilter) {
    let logger = Box::leak(Box::new(ConsoleLogger::new(level)));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{level} {target}] {message}")
}
