use color_eyre::eyre::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log filename used by formcore-based tools.
pub const LOG_FILENAME: &str = "formcore.log";

/// Configuration for the logging system.
pub struct LogConfig {
    /// Directory where log files will be written.
    pub log_dir: PathBuf,
    /// Default log level when RUST_LOG is not set.
    pub log_level: Level,
    /// Whether to use JSON format for logs.
    pub json_format: bool,
    /// Whether to write log lines to the rotating file at all.
    pub log_to_file: bool,
    /// Log rotation period.
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = crate::utils::formcore_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("logs");

        Self {
            log_dir,
            log_level: Level::INFO,
            json_format: false,
            log_to_file: true,
            rotation: Rotation::DAILY,
        }
    }
}

impl LogConfig {
    /// Derive the file-logging toggle from operator settings.
    #[must_use]
    pub fn from_settings(settings: &crate::settings::Settings) -> Self {
        Self {
            log_to_file: settings.log_to_file,
            ..Self::default()
        }
    }
}

fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("formcore={default_level}")))
}

/// Initialize the logging system with the given configuration.
///
/// Sets up stdout output and, when enabled, a rotating log file, with
/// runtime level configuration via the RUST_LOG environment variable and an
/// optional JSON format for log aggregation.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let file_layer = if config.log_to_file {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender =
            RollingFileAppender::new(config.rotation, &config.log_dir, LOG_FILENAME);
        let layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(file_appender)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .with_ansi(false) // No ANSI colors in files
                .boxed()
        };
        Some(layer.with_filter(env_filter(config.log_level)))
    } else {
        None
    };

    let stdout_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true) // Colors for terminal
            .boxed()
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer.with_filter(env_filter(config.log_level)))
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Parse rotation period from string.
#[must_use]
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Route panics through the logging pipeline before the default hook runs,
/// so they reach the same sinks as ordinary error lines.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic payload");
        tracing::error!(target: "formcore::panic", %location, "panic: {payload}");
        default_hook(info);
    }));
}
