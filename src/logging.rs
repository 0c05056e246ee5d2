use std::io::{self, Write};

use chrono::Local;
use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// 写到 stderr 的日志实现，不会和命令输出混在一起
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow(),
            Level::Info => "INFO ".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".bright_black(),
        };
        let _ = writeln!(
            io::stderr().lock(),
            "[{} {} {}] {}",
            Local::now().format("%H:%M:%S%.3f"),
            level,
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
