// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Logging setup shared by the cloud-config binaries.
//!
//! Logs always go to stderr so that stdout carries nothing but the rendered
//! document. `RUST_LOG` overrides the level chosen on the command line.

use std::io;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

// Re-export clap for convenience when using CliLoggingArgs
pub use clap;

pub use tracing::Level;

/// Output format for log messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable plaintext format
    #[default]
    Plaintext,
    /// Structured JSON format
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Plaintext => write!(f, "plaintext"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI log level enum for clap integration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error conditions
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Errors, warnings, and informational messages
    Info,
    /// All above plus per-module debug information
    Debug,
    /// All above plus detailed tracing
    Trace,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Level::from(*self).as_str().to_ascii_lowercase())
    }
}

/// Logging flags, meant to be used with `#[command(flatten)]`.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct CliLoggingArgs {
    /// Log verbosity level
    #[arg(long, global = true, value_enum, help = "Log verbosity level (default: warn)")]
    pub log_level: Option<CliLogLevel>,

    /// Log output format
    #[arg(long, global = true, value_enum, help = "Log output format (default: plaintext)")]
    pub log_format: Option<LogFormat>,
}

impl CliLoggingArgs {
    /// Install the global subscriber, writing to stderr.
    pub fn init(self, component: &str) -> anyhow::Result<()> {
        self.init_with_default_level(component, CliLogLevel::default())
    }

    pub fn init_with_default_level(
        self,
        component: &str,
        default_level: CliLogLevel,
    ) -> anyhow::Result<()> {
        init(
            component,
            self.log_level.unwrap_or(default_level).into(),
            self.log_format.unwrap_or_default(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.log_level.is_none() && self.log_format.is_none()
    }
}

/// Initialize logging to stderr
pub fn init(component: &str, default_level: Level, format: LogFormat) -> anyhow::Result<()> {
    init_with_writer(component, default_level, format, io::stderr)
}

/// Initialize logging with a custom writer
pub fn init_with_writer<W>(
    component: &str,
    default_level: Level,
    format: LogFormat,
    writer: W,
) -> anyhow::Result<()>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(component, default_level));
    tracing::subscriber::set_global_default(subscriber(filter, format, writer))?;
    Ok(())
}

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(component: &str, level: Level) -> EnvFilter {
    let target = component.replace('-', "_");
    EnvFilter::new(format!("{level},{target}={level}"))
}

/// Build a subscriber without installing it.
pub fn subscriber<W>(
    filter: EnvFilter,
    format: LogFormat,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .json();
            Box::new(registry.with(layer))
        }
        LogFormat::Plaintext => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            Box::new(registry.with(layer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    struct BufferGuard<'a>(MutexGuard<'a, Vec<u8>>);

    impl io::Write for BufferGuard<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = BufferGuard<'a>;
        fn make_writer(&'a self) -> Self::Writer {
            BufferGuard(self.0.lock().unwrap())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[derive(Parser)]
    struct Args {
        #[command(flatten)]
        logging: CliLoggingArgs,
    }

    #[test]
    fn test_cli_logging_args_parse() {
        let args = Args::try_parse_from(["test", "--log-level", "debug", "--log-format", "json"])
            .unwrap();
        assert_eq!(args.logging.log_level, Some(CliLogLevel::Debug));
        assert_eq!(args.logging.log_format, Some(LogFormat::Json));

        let args = Args::try_parse_from(["test"]).unwrap();
        assert!(args.logging.is_empty());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(Args::try_parse_from(["test", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_level_display() {
        assert_eq!(CliLogLevel::Warn.to_string(), "warn");
        assert_eq!(CliLogLevel::Trace.to_string(), "trace");
        assert_eq!(Level::from(CliLogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_filter_drops_lower_levels() {
        let buffer = Buffer::default();
        let subscriber = subscriber(
            default_filter("cloud-config", Level::WARN),
            LogFormat::Plaintext,
            buffer.clone(),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hidden message");
            tracing::warn!("visible message");
        });

        let out = buffer.contents();
        assert!(out.contains("visible message"));
        assert!(!out.contains("hidden message"));
    }

    #[test]
    fn test_json_format_emits_objects() {
        let buffer = Buffer::default();
        let subscriber = subscriber(
            default_filter("cloud-config", Level::INFO),
            LogFormat::Json,
            buffer.clone(),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(bytes = 42, "rendered document");
        });

        let out = buffer.contents();
        let line = out.lines().next().unwrap();
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["fields"]["message"], "rendered document");
        assert_eq!(event["fields"]["bytes"], 42);
    }
}
