//! Logging configuration using tracing
//!
//! Provides structured logging to stdout with support for the LOG_LEVEL and
//! RUST_LOG environment variables.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Filtering via RUST_LOG when set (full directive syntax)
/// - Otherwise a plain level from LOG_LEVEL (defaults to "info")
/// - Formatted output to stdout, unbuffered, suitable for CI log capture
///
/// # Example values
/// - `LOG_LEVEL=DEBUG` - Show debug and above
/// - `RUST_LOG=hubkit=trace` - Trace level for hubkit only
///
/// # Errors
/// Returns an error if a subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL")
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| {
            crate::HubkitError::Config(format!("Failed to initialize tracing: {}", e))
        })?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging() {
        // Should not panic even if called multiple times
        let result = init();
        // First call may succeed or fail depending on test order
        assert!(result.is_ok() || result.is_err());
        init_test();
        init_test();
    }
}
