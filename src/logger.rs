use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Appends log lines to a file. The terminal is busy drawing the game, so
/// nothing is ever written to stdout.
pub struct Logger {
    sink: Mutex<File>,
}

impl Logger {
    fn new(file: File) -> Self {
        Self { sink: Mutex::new(file) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "[{}][{}:{}] {}", timestamp, file_name, line, message);
        }
    }
}

pub fn init_logger(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    LOGGER.get_or_init(|| Logger::new(file));
    Ok(())
}

/// Log calls before `init_logger`, or without a log file, are dropped.
pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
