//! File sink for the `log` facade. The terminal belongs to the UI while it
//! runs, so records are appended to a file instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            unix_seconds(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Installs the file logger as the global `log` backend.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    let logger = FileLogger::open(path, level)?;
    log::set_boxed_logger(Box::new(logger)).map_err(io::Error::other)?;
    log::set_max_level(level);
    Ok(())
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn format_line(timestamp: u64, level: log::Level, target: &str, message: &str) -> String {
    format!("{timestamp} {level:<5} {target}: {message}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_level_and_target() {
        let line = format_line(1700000000, log::Level::Warn, "typedex::catalog", "type Fire left out");
        assert_eq!(line, "1700000000 WARN  typedex::catalog: type Fire left out\n");
    }

    #[test]
    fn records_above_the_level_are_skipped() {
        let path = std::env::temp_dir().join(format!("typedex-log-{}.log", std::process::id()));
        let _ = fs::remove_file(&path);
        let logger = FileLogger::open(&path, LevelFilter::Info).expect("open log");

        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .target("typedex")
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("typedex")
                .args(format_args!("shown"))
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("shown"));
        assert!(!contents.contains("hidden"));
        let _ = fs::remove_file(&path);
    }
}
