use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info,sqlx=warn`
pub fn init_logging_default() {
    init_logging_with(None, false);
}

/// Initialize logging from configuration values.
///
/// `RUST_LOG` wins over `level` when both are present. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logging_with(level: Option<&str>, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| match level {
            Some(l) if !l.trim().is_empty() => EnvFilter::try_new(l),
            _ => EnvFilter::try_new(DEFAULT_FILTER),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logging_with(Some("debug"), false);
        init_logging_with(Some("not a valid filter ==="), true);
        init_logging_default();
    }
}
