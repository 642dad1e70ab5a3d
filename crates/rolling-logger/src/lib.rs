//! Rolling File Logger
//!
//! Installs a `tracing` subscriber that writes to `<dir>/<app>.log`, rotating the
//! file once it grows past a size limit and keeping a fixed number of old files.
//! The most recent lines are also kept in an in-memory circular buffer so a UI can
//! show them without touching the disk.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::filter::LevelFilter;

static SINK: OnceLock<LogSink> = OnceLock::new();

/// Errors raised while setting up or using the logger
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "logger already initialized"),
            LoggerError::NotInitialized => write!(f, "logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub dir: PathBuf,
    pub app_name: String,
    pub level: log::LevelFilter,
    /// Rotate once the active file exceeds this many bytes
    pub max_file_bytes: u64,
    /// Rotated files kept next to the active one
    pub max_files: usize,
    /// Lines kept in memory for `recent_lines`
    pub memory_lines: usize,
}

impl LoggerOptions {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.to_string(),
            level: log::LevelFilter::Info,
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            memory_lines: 200,
        }
    }
}

/// Initialize logging with default options
pub fn init_logger(dir: impl Into<PathBuf>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(LoggerOptions::new(dir, app_name))
}

/// Initialize logging; only the first call in a process succeeds
pub fn init_logger_with(options: LoggerOptions) -> Result<(), LoggerError> {
    if SINK.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    fs::create_dir_all(&options.dir)?;
    let path = options.dir.join(format!("{}.log", options.app_name));
    let file = RollingFile::open(path, options.max_file_bytes, options.max_files)?;
    let sink = LogSink::new(file, options.memory_lines);

    tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(to_tracing_level(options.level))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    SINK.set(sink).map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::info!(app = %options.app_name, "logger initialized");
    Ok(())
}

/// Log an informational line through the installed logger
pub fn info(message: &str) -> Result<(), LoggerError> {
    SINK.get().ok_or(LoggerError::NotInitialized)?;
    tracing::info!(target: "rolling_logger", "{}", message);
    Ok(())
}

/// Log an error line through the installed logger
pub fn error(message: &str) -> Result<(), LoggerError> {
    SINK.get().ok_or(LoggerError::NotInitialized)?;
    tracing::error!(target: "rolling_logger", "{}", message);
    Ok(())
}

/// Most recent log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    SINK.get().map(LogSink::recent_lines).unwrap_or_default()
}

fn to_tracing_level(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

// ========================
// Rolling file
// ========================

/// Size-bounded log file: `app.log`, `app.log.1` (newest rotated) .. `app.log.N`
pub struct RollingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    max_files: usize,
}

impl RollingFile {
    pub fn open(path: PathBuf, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            written,
            max_bytes,
            max_files,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_files == 0 {
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.rotated_path(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

// ========================
// Sink shared with the subscriber
// ========================

struct SinkInner {
    file: RollingFile,
    recent: VecDeque<String>,
    capacity: usize,
}

impl SinkInner {
    fn remember(&mut self, buf: &[u8]) {
        if self.capacity == 0 {
            return;
        }
        for line in String::from_utf8_lossy(buf).lines() {
            if line.is_empty() {
                continue;
            }
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line.to_string());
        }
    }
}

/// Writer handed to `tracing-subscriber`; clones share one file and buffer
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl LogSink {
    pub fn new(file: RollingFile, memory_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SinkInner {
                file,
                recent: VecDeque::with_capacity(memory_lines),
                capacity: memory_lines,
            })),
        }
    }

    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(inner) => inner.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        inner.remember(buf);
        inner.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        inner.file.flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
