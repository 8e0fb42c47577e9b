//! Logging setup on top of `tracing-subscriber`
//!
//! Console and file outputs share one `EnvFilter` behind a reload layer, so
//! the level can be changed after startup through [`LogLevelHandle`].

pub mod config;
pub mod error;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};
use writer::RotatingFileWriter;

/// Changes the active filter of an installed logger.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replaces the filter with a level or `EnvFilter` directive.
    pub fn set_level(&self, directive: &str) -> Result<(), LoggerError> {
        let filter = EnvFilter::try_new(directive).map_err(|e| LoggerError::Level {
            message: format!("'{}': {}", directive, e),
        })?;
        self.inner.reload(filter).map_err(|e| LoggerError::Level {
            message: e.to_string(),
        })
    }

    pub fn current_level(&self) -> Option<String> {
        self.inner.with_current(|filter| filter.to_string()).ok()
    }
}

/// Installs the global subscriber described by `config`.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<LogLevelHandle> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(filter);

    let file_layer = if config.file.enabled {
        Some(file_layer(&config.file)?)
    } else {
        None
    };

    let use_ansi = config.console.colored && std::io::stdout().is_terminal();
    let console_layer = config.console.enabled.then(|| {
        fmt::layer()
            .with_ansi(use_ansi)
            .with_target(true)
            .with_level(true)
    });

    // File layer goes before the console layer, otherwise ANSI codes from
    // span fields leak into the file (tokio-rs/tracing#1817).
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(LogLevelHandle { inner: handle })
}

fn file_layer<S>(config: &FileConfig) -> anyhow::Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let writer = RotatingFileWriter::new(config)?;
    let layer = match config.format {
        LogFormat::Full => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .compact()
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .boxed(),
    };
    Ok(layer)
}
