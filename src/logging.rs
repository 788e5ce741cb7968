use crate::config::AppSettings;
use crossbeam_channel::Sender;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::thread;

const LOG_FILE_NAME: &str = "desk_widgets.log";

struct FileLogger {
    level: LevelFilter,
    tx: Sender<String>,
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
            &timestamp(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if cfg!(debug_assertions) {
            eprintln!("{line}");
        }
        let _ = self.tx.send(line);
    }

    fn flush(&self) {}
}

pub fn init(level: &str) -> Result<(), SetLoggerError> {
    let level = parse_level(level);
    let path = log_path();
    let (tx, rx) = crossbeam_channel::unbounded::<String>();

    thread::spawn(move || {
        let file = OpenOptions::new().create(true).append(true).open(&path);
        let mut file = match file {
            Ok(file) => file,
            Err(err) => {
                eprintln!("failed to open log file {}: {err}", path.display());
                while rx.recv().is_ok() {}
                return;
            }
        };
        while let Ok(line) = rx.recv() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    });

    log::set_boxed_logger(Box::new(FileLogger { level, tx }))
        .map(|()| log::set_max_level(level))
}

pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

fn log_path() -> PathBuf {
    match AppSettings::config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => dir.join(LOG_FILE_NAME),
        _ => PathBuf::from(LOG_FILE_NAME),
    }
}

fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}

fn format_line(ts: &str, level: log::Level, target: &str, message: &str) -> String {
    format!("{ts} [{level}] {target}: {message}")
}
