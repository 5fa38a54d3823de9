//! Diagnostic logger injected into a request.
//!
//! # Design
//! A `Logger` is owned by the `HttpRequest` it serves; there is no global
//! debug state. Level `0` silences it. A message is written when its own
//! verbosity is at most the logger's level.
//!
//! The default channel forwards to `tracing`. `Stdout` and `File` write
//! plain lines of the form `timestamp pid type message`. Switching channel
//! drops (and so closes) the previous file before the new one is opened.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::error::HttpError;

/// Where diagnostic lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DebugChannel {
    #[default]
    Tracing,
    Stdout,
    /// Appended to, created if missing.
    File(PathBuf),
}

/// Message type, printed as `I`, `W` or `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn code(self) -> char {
        match self {
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

#[derive(Debug)]
enum Sink {
    Tracing,
    Stdout,
    File(File),
}

#[derive(Debug)]
pub struct Logger {
    level: u8,
    channel: DebugChannel,
    sink: Sink,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Logger {
    /// A logger on the `tracing` channel.
    pub fn new(level: u8) -> Self {
        Self {
            level,
            channel: DebugChannel::Tracing,
            sink: Sink::Tracing,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    pub fn channel(&self) -> &DebugChannel {
        &self.channel
    }

    /// Close the current channel, then open `channel`.
    ///
    /// If the new file cannot be opened the logger falls back to `Tracing`.
    pub fn set_channel(&mut self, channel: DebugChannel) -> Result<(), HttpError> {
        self.sink = Sink::Tracing;
        self.channel = DebugChannel::Tracing;

        let sink = match &channel {
            DebugChannel::Tracing => Sink::Tracing,
            DebugChannel::Stdout => Sink::Stdout,
            DebugChannel::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        HttpError::Configuration(format!(
                            "cannot open debug file {}: {e}",
                            path.display()
                        ))
                    })?;
                Sink::File(file)
            }
        };
        self.sink = sink;
        self.channel = channel;
        Ok(())
    }

    pub fn enabled(&self, verbosity: u8) -> bool {
        self.level > 0 && verbosity <= self.level
    }

    pub fn log(&mut self, severity: Severity, verbosity: u8, message: &str) {
        if !self.enabled(verbosity) {
            return;
        }
        match &mut self.sink {
            Sink::Tracing => match severity {
                Severity::Info => tracing::debug!(target: "minihttp", "{message}"),
                Severity::Warning => tracing::warn!(target: "minihttp", "{message}"),
                Severity::Error => tracing::error!(target: "minihttp", "{message}"),
            },
            Sink::Stdout => println!("{}", format_line(severity, message)),
            Sink::File(file) => {
                if let Err(e) = writeln!(file, "{}", format_line(severity, message)) {
                    tracing::warn!(error = %e, "failed to write debug line");
                }
            }
        }
    }

    pub fn info(&mut self, message: &str) {
        self.log(Severity::Info, 1, message);
    }

    pub fn warn(&mut self, message: &str) {
        self.log(Severity::Warning, 1, message);
    }

    pub fn error(&mut self, message: &str) {
        self.log(Severity::Error, 1, message);
    }
}

fn format_line(severity: Severity, message: &str) -> String {
    format!(
        "{} {:<5} {} {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        std::process::id(),
        severity.code(),
        message
    )
}
