//! Per-connection SDK log file.
//!
//! When a connection is configured with a log level, request and response
//! lines are written to a log file through a `tracing` dispatcher owned by
//! that connection. Every line is also emitted to the current subscriber,
//! whether or not a file is configured.

use std::path::Path;
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use super::config::{LogConfig, LogLevel};
use crate::{AdapterError, Result};

/// Writes SDK log lines to the configured file.
#[derive(Clone, Debug)]
pub struct SdkLog {
    level: LogLevel,
    dispatch: Option<Dispatch>,
}

impl SdkLog {
    /// A log that drops everything.
    pub fn disabled() -> Self {
        Self {
            level: LogLevel::None,
            dispatch: None,
        }
    }

    /// Open the log file described by `config`.
    ///
    /// Level `NONE` yields a disabled log without touching the filesystem.
    pub fn to_file(config: &LogConfig) -> Result<Self> {
        if !config.level.is_enabled() {
            return Ok(Self::disabled());
        }

        let file_name = config
            .file_name
            .file_name()
            .ok_or_else(|| {
                AdapterError::invalid_config("log file", "path must name a file")
            })?
            .to_string_lossy()
            .into_owned();
        let directory = config
            .file_name
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(directory)
            .map_err(|e| AdapterError::Storage(format!("failed to open SDK log file: {}", e)))?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(appender)
            .with_ansi(false)
            .with_max_level(config.level.level_filter())
            .finish();

        Ok(Self {
            level: config.level,
            dispatch: Some(Dispatch::new(subscriber)),
        })
    }

    /// Configured level.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns true if lines are written anywhere.
    pub fn is_enabled(&self) -> bool {
        self.dispatch.is_some()
    }

    /// Write a debug line.
    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    /// Write an info line.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    /// Write a warning line.
    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warning, message);
    }

    /// Write an error line.
    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::None => {}
        }

        let Some(dispatch) = &self.dispatch else {
            return;
        };

        tracing::dispatcher::with_default(dispatch, || match level {
            LogLevel::Debug => tracing::debug!(target: "paypal_sdk", "{}", message),
            LogLevel::Info => tracing::info!(target: "paypal_sdk", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "paypal_sdk", "{}", message),
            LogLevel::Error => tracing::error!(target: "paypal_sdk", "{}", message),
            LogLevel::None => {}
        });
    }
}
