use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Per-crate filter directives, e.g. `dlt645_frame=trace,dlt645_transport=info`.
/// Overrides `--log-level` when set.
pub const LOG_ENV: &str = "DLT645_LOG";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn directives(level: LogLevel, env: Option<String>) -> String {
    env.map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| level.as_directive().to_string())
}

fn build_filter(level: LogLevel, env: Option<String>) -> EnvFilter {
    EnvFilter::try_new(directives(level, env))
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Frames and serial events are logged to stderr so stdout stays parseable.
///
/// Malformed `DLT645_LOG` directives fall back to `level`.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let env = std::env::var(LOG_ENV).ok();
    let show_target = env.is_some();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(level, env))
        .with_ansi(false)
        .with_target(show_target);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_flag_applies_without_env() {
        assert_eq!(directives(LogLevel::Warn, None), "warn");
        assert_eq!(directives(LogLevel::Trace, Some("  ".to_string())), "trace");
    }

    #[test]
    fn env_directives_override_level_flag() {
        assert_eq!(
            directives(LogLevel::Warn, Some(" dlt645_frame=trace ".to_string())),
            "dlt645_frame=trace"
        );
    }

    #[test]
    fn malformed_env_falls_back_to_level() {
        let filter = build_filter(LogLevel::Info, Some("dlt645_frame=loud".to_string()));
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing::level_filters::LevelFilter::INFO)
        );
    }
}
