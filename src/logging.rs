use tracing_subscriber::fmt;

/// Only warnings and errors by default; stdout belongs to the timing report.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber. Safe to call more than once.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

pub fn init_with_filter(filter: &str) {
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
