// Logging setup shared by the CLI and the web server

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter for our own crate plus the HTTP stack at `level`.
/// `RUST_LOG` wins when it is set.
pub fn filter_directives(level: &str) -> String {
    format!("pricing_dashboard={level},pricing_server={level},tower_http={level},axum=warn")
}

/// Install a stderr fmt subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let directives = filter_directives("debug");
        assert!(directives.contains("pricing_dashboard=debug"));
        assert!(directives.contains("tower_http=debug"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing("info");
        init_tracing("warn");
    }
}
