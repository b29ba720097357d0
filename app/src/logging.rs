use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter used when neither `RUST_LOG` nor `AURA_LOG` is set and no verbosity was asked for.
pub const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive: `-v` flags win, then `RUST_LOG`, then the configured filter.
pub fn filter_directive(verbose: u8, rust_log: Option<&str>, configured: &str) -> String {
    match verbose {
        0 => rust_log
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(configured)
            .to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the stderr subscriber. stdout stays reserved for results.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
