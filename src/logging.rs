use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

pub fn build_filter(spec: Option<&str>) -> EnvFilter {
    spec.and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Logs go to stderr; stdout carries
/// only the energy sequence.
pub fn setup_logging() {
    let spec = std::env::var("RUST_LOG").ok();
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // A subscriber may already be installed when embedded in a host.
    let _ = tracing_subscriber::registry()
        .with(build_filter(spec.as_deref()))
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn default_filter_is_warn() {
        assert_eq!(build_filter(None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn explicit_filter_is_used() {
        assert_eq!(
            build_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn setup_twice_does_not_panic() {
        setup_logging();
        setup_logging();
    }
}
