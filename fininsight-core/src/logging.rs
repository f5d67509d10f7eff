//! Logger setup.
//!
//! [`setup_logger`] installs the global `tracing` subscriber (console plus
//! any append-only log files) the first time it runs and hands back a named
//! [`LoggerHandle`]. Repeat calls with the same name return the handle
//! registered first, so setup is safe to call more than once.
//!
//! Each handle gates its own messages by its own level. The first
//! registration's level only sets the threshold for events the library emits
//! through the plain `tracing` macros. Every log file named at registration is
//! attached to the shared file sink and receives all emitted lines.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;
use tracing::{Level, Span};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*};

/// Log file written next to the working directory unless overridden.
pub const DEFAULT_LOG_FILE: &str = "financial_insights.log";

/// Target carried by every event a [`LoggerHandle`] emits.
const LOGGER_TARGET: &str = "fininsight::logger";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logger registry lock poisoned")]
    RegistryPoisoned,
}

/// Options for [`setup_logger_with`].
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    /// Most verbose level the logger emits.
    pub level: Level,
    /// Append log lines here as well as to stderr. `None` means console only.
    pub log_file: Option<PathBuf>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

/// A named logger.
///
/// Messages below the handle's level are dropped. Everything else is
/// emitted inside a `logger{name=...}` span so the name shows up in every
/// line.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    inner: Arc<LoggerInner>,
}

#[derive(Debug)]
struct LoggerInner {
    name: String,
    level: Level,
    span: Span,
}

impl LoggerHandle {
    fn new(name: &str, level: Level) -> Self {
        let span = tracing::span!(target: LOGGER_TARGET, Level::ERROR, "logger", name = %name);
        Self {
            inner: Arc::new(LoggerInner {
                name: name.to_string(),
                level,
                span,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn level(&self) -> Level {
        self.inner.level
    }

    /// True if a message at `level` would be emitted by this handle.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.inner.level
    }

    /// True if both handles came from the same registration.
    pub fn same_logger(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn log(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let span = &self.inner.span;
        match level {
            Level::ERROR => tracing::error!(target: LOGGER_TARGET, parent: span, "{message}"),
            Level::WARN => tracing::warn!(target: LOGGER_TARGET, parent: span, "{message}"),
            Level::INFO => tracing::info!(target: LOGGER_TARGET, parent: span, "{message}"),
            Level::DEBUG => tracing::debug!(target: LOGGER_TARGET, parent: span, "{message}"),
            _ => tracing::trace!(target: LOGGER_TARGET, parent: span, "{message}"),
        }
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }
}

/// Shared file sink: every attached file receives every formatted line.
#[derive(Clone, Default)]
struct LogFiles {
    files: Arc<Mutex<Vec<(PathBuf, File)>>>,
}

impl LogFiles {
    /// Open `path` for appending and add it to the sink. Already attached
    /// paths are left as they are.
    fn attach(&self, path: &Path) -> Result<(), LoggingError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| LoggingError::RegistryPoisoned)?;
        if files.iter().any(|(attached, _)| attached == path) {
            return Ok(());
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggingError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        files.push((path.to_path_buf(), file));
        Ok(())
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.iter().map(|(path, _)| path.clone()).collect())
            .unwrap_or_default()
    }
}

impl<'a> MakeWriter<'a> for LogFiles {
    type Writer = LogFiles;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for LogFiles {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file sink poisoned"))?;
        for (_, file) in files.iter_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file sink poisoned"))?;
        for (_, file) in files.iter_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Registry {
    subscriber_installed: bool,
    files: LogFiles,
    loggers: HashMap<String, LoggerHandle>,
}

fn registry() -> &'static Mutex<Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Registry::default()))
}

/// Set up logger `name` at `level`, writing to stderr and [`DEFAULT_LOG_FILE`].
pub fn setup_logger(name: &str, level: Level) -> Result<LoggerHandle, LoggingError> {
    setup_logger_with(
        name,
        &LoggerOptions {
            level,
            ..LoggerOptions::default()
        },
    )
}

/// Set up logger `name` with explicit options.
///
/// The first call in a process installs the global subscriber. Each new
/// registration attaches its `log_file`, if any, to the shared file sink. A
/// later call for an already registered name returns the existing handle
/// unchanged, including its original level, and attaches nothing.
pub fn setup_logger_with(name: &str, options: &LoggerOptions) -> Result<LoggerHandle, LoggingError> {
    let mut registry = registry()
        .lock()
        .map_err(|_| LoggingError::RegistryPoisoned)?;

    if let Some(existing) = registry.loggers.get(name) {
        return Ok(existing.clone());
    }

    if let Some(path) = &options.log_file {
        registry.files.attach(path)?;
    }

    if !registry.subscriber_installed {
        install_subscriber(options.level, registry.files.clone());
        registry.subscriber_installed = true;
    }

    let handle = LoggerHandle::new(name, options.level);
    registry.loggers.insert(name.to_string(), handle.clone());
    Ok(handle)
}

/// True if `name` has been registered by [`setup_logger_with`].
pub fn is_registered(name: &str) -> bool {
    registry()
        .lock()
        .map(|registry| registry.loggers.contains_key(name))
        .unwrap_or(false)
}

/// Log files currently attached to the shared sink, in attach order.
pub fn log_files() -> Vec<PathBuf> {
    registry()
        .lock()
        .map(|registry| registry.files.paths())
        .unwrap_or_default()
}

fn install_subscriber(default_level: Level, files: LogFiles) {
    // Handle events are already gated by their handle's level.
    let filter = Targets::new()
        .with_target(LOGGER_TARGET, LevelFilter::TRACE)
        .with_default(LevelFilter::from_level(default_level));

    let console_layer = fmt::layer().with_writer(io::stderr).with_target(false);
    let file_layer = fmt::layer()
        .with_writer(files)
        .with_ansi(false)
        .with_target(false);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = installed {
        // Someone else owns the global subscriber; handles log through it.
        tracing::debug!(error = %e, "global subscriber already set");
    }
}
